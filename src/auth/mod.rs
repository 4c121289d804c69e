//! Credentials and OAuth2 token types.

mod credentials;
mod tokens;

pub use credentials::Credentials;
pub use tokens::{AccessToken, TokenGrant};
