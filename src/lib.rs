//! orcid - client library for the ORCID researcher-identifier API.
//!
//! Provides [`PublicClient`] and [`MemberClient`] over the public and
//! member APIs: OAuth2 token grants, record reads and writes addressed
//! by put-code, JSON/XML record bodies, and paginated search.

pub mod auth;
pub mod client;
pub mod error;
pub mod record;
pub mod types;

pub use auth::{AccessToken, Credentials, TokenGrant};
pub use client::{
    Audience, Endpoints, Environment, LoginUrlOptions, MemberClient, PublicClient, SearchMethod,
    SearchResults,
};
pub use error::Error;
pub use record::{ContentType, Record, RecordBody, XmlDocument};
pub use types::{OrcidId, PutCode, PutCodeClass, PutCodes, ResourceType};

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
