//! Error types for the orcid library.
//!
//! This module provides a unified error type with explicit variants for
//! transport, authentication, HTTP, and input validation errors.

use std::fmt;
use thiserror::Error;

/// The unified error type for orcid operations.
///
/// This error type covers all possible failure modes in the library,
/// with explicit variants to allow callers to handle specific cases.
#[derive(Debug, Error)]
pub enum Error {
    /// Network transport errors (DNS, TLS, connection, timeout).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Authentication errors (interactive login scraping failures).
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Non-2xx responses from the ORCID API.
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    /// Input validation errors (invalid ORCID iD, put-code usage, MIME type).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// Generic HTTP transport error.
    #[error("HTTP transport error: {message}")]
    Http { message: String },
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_connect() {
            TransportError::Connection {
                message: err.to_string(),
            }
        } else {
            TransportError::Http {
                message: err.to_string(),
            }
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(TransportError::from(err))
    }
}

/// Authentication-related errors from the interactive login flow.
///
/// These indicate an upstream UI change or wrong credentials and are
/// never retried internally.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The CSRF token could not be located in the sign-in page HTML.
    #[error("CSRF token not found in sign-in page")]
    CsrfNotFound,

    /// The login response carried no redirect URL with an authorization code.
    #[error("authorization code not found in login response")]
    AuthorizationCodeNotFound,

    /// The token response did not include an expected field.
    #[error("token response missing field '{field}'")]
    MissingTokenField { field: &'static str },
}

/// A non-2xx response from the ORCID API.
///
/// Carries the status code and the raw response body, surfaced verbatim
/// to the caller. Never retried internally.
#[derive(Debug)]
pub struct HttpError {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body.
    pub body: String,
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if !self.body.is_empty() {
            write!(f, ": {}", self.body)?;
        }
        Ok(())
    }
}

impl std::error::Error for HttpError {}

impl HttpError {
    /// Create a new HTTP error.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Check if this is an authentication failure.
    pub fn is_auth_error(&self) -> bool {
        self.status == 401 || self.status == 403
    }
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid ORCID iD format or checksum.
    #[error("invalid ORCID iD '{value}': {reason}")]
    OrcidId { value: String, reason: String },

    /// Invalid put-code format.
    #[error("invalid put-code '{value}': {reason}")]
    PutCode { value: String, reason: String },

    /// Put-code argument violates the requirement of the resource type.
    #[error("invalid put-code usage: {0}")]
    PutCodeUsage(#[from] PutCodeUsageError),

    /// Unrecognized MIME type for the record codec.
    #[error("unsupported content type '{value}'")]
    UnsupportedContentType { value: String },

    /// Malformed XML document.
    #[error("invalid XML document: {reason}")]
    Xml { reason: String },

    /// Generic invalid input.
    #[error("invalid input: {message}")]
    Other { message: String },
}

/// The put-code requirement rule violated by a request, detected before
/// any network call.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PutCodeUsageError {
    /// The resource type addresses individual records and requires a put-code.
    #[error("resource type '{resource_type}' requires a put-code")]
    MissingWhenRequired { resource_type: String },

    /// The resource type is a summary and must not take a put-code.
    #[error("resource type '{resource_type}' is a summary; the put-code is redundant")]
    RedundantWhenForbidden { resource_type: String },

    /// The resource type addresses a collection and needs a list of put-codes.
    #[error("resource type '{resource_type}' takes a list of put-codes")]
    MustBeListForCollection { resource_type: String },

    /// The resource type addresses one record and takes a single put-code.
    #[error("resource type '{resource_type}' takes a single put-code")]
    MustBeSingle { resource_type: String },
}
