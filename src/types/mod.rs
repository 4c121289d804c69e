//! Core identifier types.

mod orcid_id;
mod put_code;
mod resource;

pub use orcid_id::OrcidId;
pub use put_code::{PutCode, PutCodes};
pub use resource::{PutCodeClass, ResourceType};
