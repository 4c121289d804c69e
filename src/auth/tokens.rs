//! Bearer token types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque bearer token for API requests.
///
/// Tokens are short-lived and obtained per call or cached by the caller;
/// the library holds no token state across calls.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    /// Create a new access token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the token string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for AccessToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl From<&str> for AccessToken {
    fn from(token: &str) -> Self {
        Self(token.to_string())
    }
}

impl PartialEq<&str> for AccessToken {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

// Intentionally hide the token in Debug output
impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AccessToken").field(&"[REDACTED]").finish()
    }
}

/// A full OAuth2 token response from the registry.
///
/// Returned by the authorization-code and interactive login flows, which
/// associate the token with a researcher's ORCID iD.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenGrant {
    /// The bearer token itself.
    pub access_token: AccessToken,

    /// Token type, normally `bearer`.
    #[serde(default)]
    pub token_type: Option<String>,

    /// Lifetime in seconds.
    #[serde(default)]
    pub expires_in: Option<u64>,

    /// Granted scope string.
    #[serde(default)]
    pub scope: Option<String>,

    /// The ORCID iD the token is bound to, when the grant involves a user.
    #[serde(default)]
    pub orcid: Option<String>,

    /// The researcher's display name, when provided.
    #[serde(default)]
    pub name: Option<String>,
}
