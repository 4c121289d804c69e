//! Record representation and wire codec.
//!
//! A [`Record`] is the native mapping representation of an ORCID resource.
//! On the wire a record travels as either `application/orcid+json` or
//! `application/orcid+xml`; [`RecordBody`] carries one or the other and
//! [`codec`] converts between bodies and bytes.

pub(crate) mod codec;
pub mod xml;

pub use codec::ContentType;
pub use xml::XmlDocument;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::{Error, InvalidInputError};
use crate::types::{PutCode, ResourceType};

/// A record in its native mapping representation.
///
/// This type guarantees the value is a JSON object, mirroring the ORCID
/// resource schema (`title`, `type`, `external-ids`, ...). A record that
/// exists server-side carries its identifier under the `put-code` key.
///
/// # Example
///
/// ```
/// use orcid::Record;
/// use serde_json::json;
///
/// let record = Record::new(json!({
///     "title": {"title": {"value": "Collected Works"}},
///     "type": "BOOK"
/// })).unwrap();
///
/// assert!(record.put_code().is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Record(Value);

impl Record {
    /// Create a new record from a JSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not a JSON object.
    pub fn new(value: Value) -> Result<Self, Error> {
        if !value.is_object() {
            return Err(InvalidInputError::Other {
                message: "record must be a JSON object".to_string(),
            }
            .into());
        }
        Ok(Self(value))
    }

    /// Returns the record's put-code, if the record exists server-side.
    ///
    /// The registry serializes put-codes both as strings and as numbers;
    /// either form is accepted.
    pub fn put_code(&self) -> Option<PutCode> {
        match self.0.get("put-code") {
            Some(Value::String(s)) => PutCode::new(s.clone()).ok(),
            Some(Value::Number(n)) => PutCode::new(n.to_string()).ok(),
            _ => None,
        }
    }

    /// Sets the `put-code` key.
    pub fn set_put_code(&mut self, put_code: &PutCode) {
        // Safe: validated as an object at construction
        self.0
            .as_object_mut()
            .unwrap()
            .insert("put-code".to_string(), Value::String(put_code.to_string()));
    }

    /// Get a field from the record.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Get a reference to the inner JSON value.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Consume and return the inner JSON value.
    pub fn into_value(self) -> Value {
        self.0
    }
}

impl Serialize for Record {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Record::new(value).map_err(serde::de::Error::custom)
    }
}

/// A record body in one of the two supported wire formats.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordBody {
    /// An `application/orcid+json` body.
    Json(Record),
    /// An `application/orcid+xml` body, passed through verbatim.
    Xml(XmlDocument),
}

impl RecordBody {
    /// Build an XML body from a native record.
    ///
    /// Fills the fixed document skeleton for the writable activity types;
    /// see [`xml::render`] for the template rules. Use this to send a
    /// record as `application/orcid+xml` without hand-writing the
    /// document.
    pub fn from_template(resource_type: ResourceType, record: &Record) -> Result<Self, Error> {
        Ok(RecordBody::Xml(xml::render(resource_type, record)?))
    }

    /// Returns the content type matching this body.
    pub fn content_type(&self) -> ContentType {
        match self {
            RecordBody::Json(_) => ContentType::OrcidJson,
            RecordBody::Xml(_) => ContentType::OrcidXml,
        }
    }

    /// Returns the inner JSON record, if this is a JSON body.
    pub fn as_json(&self) -> Option<&Record> {
        match self {
            RecordBody::Json(record) => Some(record),
            RecordBody::Xml(_) => None,
        }
    }

    /// Returns the inner XML document, if this is an XML body.
    pub fn as_xml(&self) -> Option<&XmlDocument> {
        match self {
            RecordBody::Json(_) => None,
            RecordBody::Xml(doc) => Some(doc),
        }
    }
}

impl From<Record> for RecordBody {
    fn from(record: Record) -> Self {
        RecordBody::Json(record)
    }
}

impl From<XmlDocument> for RecordBody {
    fn from(doc: XmlDocument) -> Self {
        RecordBody::Xml(doc)
    }
}
