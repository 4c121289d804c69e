//! Institution credentials type.

use std::fmt;

/// Credentials issued to an institution by the ORCID registry.
///
/// This type holds the client key and secret used for OAuth2 token
/// requests. The pair is immutable once a client is constructed.
///
/// # Security
///
/// The secret is never exposed in Debug output to prevent accidental logging.
///
/// # Example
///
/// ```
/// use orcid::Credentials;
///
/// let creds = Credentials::new("APP-0123456789ABCDEF", "client-secret");
/// assert_eq!(creds.key(), "APP-0123456789ABCDEF");
/// ```
pub struct Credentials {
    key: String,
    secret: String,
}

impl Credentials {
    /// Create new credentials.
    ///
    /// # Arguments
    ///
    /// * `key` - The ORCID client id given to the institution
    /// * `secret` - The ORCID client secret given to the institution
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            secret: secret.into(),
        }
    }

    /// Returns the institution key (OAuth2 client id).
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the institution secret.
    ///
    /// # Security
    ///
    /// Use this only when constructing token requests.
    /// Never log or display this value.
    pub(crate) fn secret(&self) -> &str {
        &self.secret
    }
}

// Intentionally hide the secret in Debug output
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("key", &self.key)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

// Clone is intentionally implemented to allow credentials to be reused,
// but the type is not Copy to make credential passing explicit.
impl Clone for Credentials {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            secret: self.secret.clone(),
        }
    }
}
