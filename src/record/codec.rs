//! Content-type tagged codec for record bodies.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, InvalidInputError};
use crate::record::{Record, RecordBody, XmlDocument};
use crate::types::PutCode;

/// The wire format of a record body.
///
/// Determines the codec used for both request and response bodies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentType {
    /// `application/orcid+json`
    OrcidJson,
    /// `application/orcid+xml`
    OrcidXml,
}

impl ContentType {
    /// Returns the MIME string for this content type.
    pub fn as_mime(self) -> &'static str {
        match self {
            ContentType::OrcidJson => "application/orcid+json",
            ContentType::OrcidXml => "application/orcid+xml",
        }
    }

    /// Parse a MIME string.
    ///
    /// # Errors
    ///
    /// An unrecognized value is a programmer error and fails with
    /// [`InvalidInputError::UnsupportedContentType`] naming the value.
    pub fn from_mime(mime: &str) -> Result<Self, Error> {
        match mime {
            "application/orcid+json" => Ok(ContentType::OrcidJson),
            "application/orcid+xml" => Ok(ContentType::OrcidXml),
            other => Err(InvalidInputError::UnsupportedContentType {
                value: other.to_string(),
            }
            .into()),
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_mime())
    }
}

/// Serialize a record body to wire bytes.
///
/// JSON bodies are structurally serialized; XML bodies are written
/// verbatim. The body must match the declared content type.
pub fn serialize(body: &RecordBody, content_type: ContentType) -> Result<Vec<u8>, Error> {
    check_body_matches(body, content_type)?;
    match body {
        RecordBody::Json(record) => serde_json::to_vec(record).map_err(|e| {
            InvalidInputError::Other {
                message: format!("failed to serialize record: {}", e),
            }
            .into()
        }),
        RecordBody::Xml(doc) => Ok(doc.as_bytes().to_vec()),
    }
}

/// Deserialize wire bytes into a record body per the declared content type.
pub fn deserialize(bytes: &[u8], content_type: ContentType) -> Result<RecordBody, Error> {
    match content_type {
        ContentType::OrcidJson => {
            let value: serde_json::Value = serde_json::from_slice(bytes).map_err(|e| {
                InvalidInputError::Other {
                    message: format!("failed to parse JSON response: {}", e),
                }
            })?;
            Ok(RecordBody::Json(Record::new(value)?))
        }
        ContentType::OrcidXml => Ok(RecordBody::Xml(XmlDocument::parse(bytes.to_vec())?)),
    }
}

/// Inject a put-code into a record body.
///
/// JSON bodies get a `put-code` key; XML bodies get a `put-code` attribute
/// on the document root.
pub fn inject_put_code(body: &mut RecordBody, put_code: &PutCode) -> Result<(), Error> {
    match body {
        RecordBody::Json(record) => {
            record.set_put_code(put_code);
            Ok(())
        }
        RecordBody::Xml(doc) => doc.set_put_code(put_code),
    }
}

fn check_body_matches(body: &RecordBody, content_type: ContentType) -> Result<(), Error> {
    if body.content_type() != content_type {
        return Err(InvalidInputError::Other {
            message: format!(
                "record body is {} but {} was requested",
                body.content_type(),
                content_type
            ),
        }
        .into());
    }
    Ok(())
}
