//! XML document handling for `application/orcid+xml` bodies.
//!
//! The registry's XML schema is namespaced (`common`, `work`, `activities`,
//! ...). A caller can hand the library an already-constructed document,
//! which is sent verbatim, or build one from a native [`Record`] with
//! [`render`], which fills the fixed v2.0 document skeleton for the
//! writable activity types.

use std::fmt;

use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use serde_json::Value;

use crate::error::{Error, InvalidInputError};
use crate::record::Record;
use crate::types::{PutCode, ResourceType};

const COMMON_NS: &str = "http://www.orcid.org/ns/common";

fn xml_err(e: impl fmt::Display) -> Error {
    InvalidInputError::Xml {
        reason: e.to_string(),
    }
    .into()
}

/// A well-formed XML document.
///
/// Documents are validated at construction and otherwise treated as opaque
/// bytes: serialization is verbatim pass-through. The one structural
/// operation supported is setting a `put-code` attribute on the root
/// element, which is how the registry addresses updates.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlDocument {
    bytes: Vec<u8>,
    root: String,
}

impl XmlDocument {
    /// Parse a document from bytes, validating well-formedness.
    pub fn parse(bytes: impl Into<Vec<u8>>) -> Result<Self, Error> {
        let bytes = bytes.into();
        let mut reader = Reader::from_reader(bytes.as_slice());
        let mut buf = Vec::new();
        let mut root: Option<String> = None;

        loop {
            match reader.read_event_into(&mut buf).map_err(xml_err)? {
                Event::Start(e) | Event::Empty(e) => {
                    if root.is_none() {
                        root = Some(String::from_utf8_lossy(e.name().as_ref()).into_owned());
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        let root = root.ok_or_else(|| xml_err("document has no root element"))?;
        Ok(Self { bytes, root })
    }

    /// Parse a document from a string.
    pub fn from_str(s: &str) -> Result<Self, Error> {
        Self::parse(s.as_bytes().to_vec())
    }

    /// Returns the qualified name of the root element.
    pub fn root_name(&self) -> &str {
        &self.root
    }

    /// Returns the document bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume and return the document bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Set an attribute on the root element, replacing any existing value.
    pub fn set_root_attribute(&mut self, name: &str, value: &str) -> Result<(), Error> {
        let mut reader = Reader::from_reader(self.bytes.as_slice());
        let mut writer = Writer::new(Vec::new());
        let mut buf = Vec::new();
        let mut rewritten = false;

        loop {
            let event = reader.read_event_into(&mut buf).map_err(xml_err)?;
            match event {
                Event::Start(ref e) if !rewritten => {
                    let elem = rewrite_with_attribute(e, name, value)?;
                    writer.write_event(Event::Start(elem)).map_err(xml_err)?;
                    rewritten = true;
                }
                Event::Empty(ref e) if !rewritten => {
                    let elem = rewrite_with_attribute(e, name, value)?;
                    writer.write_event(Event::Empty(elem)).map_err(xml_err)?;
                    rewritten = true;
                }
                Event::Eof => break,
                other => writer.write_event(other).map_err(xml_err)?,
            }
            buf.clear();
        }

        self.bytes = writer.into_inner();
        Ok(())
    }

    /// Set the `put-code` attribute on the root element.
    pub fn set_put_code(&mut self, put_code: &PutCode) -> Result<(), Error> {
        self.set_root_attribute("put-code", put_code.as_str())
    }
}

fn rewrite_with_attribute(
    e: &BytesStart<'_>,
    name: &str,
    value: &str,
) -> Result<BytesStart<'static>, Error> {
    let elem_name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let mut elem = BytesStart::new(elem_name);
    for attr in e.attributes() {
        let attr = attr.map_err(xml_err)?;
        if attr.key.as_ref() != name.as_bytes() {
            elem.push_attribute(attr);
        }
    }
    elem.push_attribute((name, value));
    Ok(elem)
}

// Documents are UTF-8 in practice; lossy conversion keeps Display total.
impl fmt::Display for XmlDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.bytes))
    }
}

/// Render a native record into the fixed XML skeleton for a writable
/// activity type.
///
/// One template exists per resource type; the record's `title`, `type`,
/// organization and external-id fields are substituted into the document.
/// Types without a template (summaries, person data) are rejected.
pub fn render(resource_type: ResourceType, record: &Record) -> Result<XmlDocument, Error> {
    let (prefix, ns) = match resource_type {
        ResourceType::Work => ("work", "http://www.orcid.org/ns/work"),
        ResourceType::Education => ("education", "http://www.orcid.org/ns/education"),
        ResourceType::Employment => ("employment", "http://www.orcid.org/ns/employment"),
        ResourceType::Funding => ("funding", "http://www.orcid.org/ns/funding"),
        ResourceType::PeerReview => ("peer-review", "http://www.orcid.org/ns/peer-review"),
        other => {
            return Err(InvalidInputError::Other {
                message: format!("no XML template for resource type '{}'", other),
            }
            .into());
        }
    };

    let mut writer = Writer::new(Vec::new());

    let mut root = BytesStart::new(format!("{0}:{0}", prefix));
    root.push_attribute(("xmlns:common", COMMON_NS));
    root.push_attribute((format!("xmlns:{}", prefix).as_str(), ns));
    if let Some(code) = record.put_code() {
        root.push_attribute(("put-code", code.as_str()));
    }
    writer.write_event(Event::Start(root)).map_err(xml_err)?;

    match resource_type {
        ResourceType::Work => render_work(&mut writer, record)?,
        ResourceType::Funding => render_funding(&mut writer, record)?,
        ResourceType::Education | ResourceType::Employment => {
            render_affiliation(&mut writer, prefix, record)?
        }
        ResourceType::PeerReview => render_peer_review(&mut writer, record)?,
        _ => unreachable!(),
    }

    writer
        .write_event(Event::End(BytesEnd::new(format!("{0}:{0}", prefix))))
        .map_err(xml_err)?;

    XmlDocument::parse(writer.into_inner())
}

fn render_work(writer: &mut Writer<Vec<u8>>, record: &Record) -> Result<(), Error> {
    if let Some(title) = title_of(record) {
        start(writer, "work:title")?;
        leaf(writer, "common:title", &title)?;
        if let Some(subtitle) = nested_str(record, &["title", "subtitle", "value"]) {
            leaf(writer, "common:subtitle", &subtitle)?;
        }
        end(writer, "work:title")?;
    }
    if let Some(journal) = field_str(record, "journal-title") {
        leaf(writer, "work:journal-title", &journal)?;
    }
    if let Some(desc) = field_str(record, "short-description") {
        leaf(writer, "work:short-description", &desc)?;
    }
    if let Some(kind) = field_str(record, "type") {
        leaf(writer, "work:type", &kind)?;
    }
    render_external_ids(writer, record)
}

fn render_funding(writer: &mut Writer<Vec<u8>>, record: &Record) -> Result<(), Error> {
    if let Some(kind) = field_str(record, "type") {
        leaf(writer, "funding:type", &kind)?;
    }
    if let Some(title) = title_of(record) {
        start(writer, "funding:title")?;
        leaf(writer, "common:title", &title)?;
        end(writer, "funding:title")?;
    }
    render_external_ids(writer, record)?;
    render_organization(writer, "funding:organization", record)
}

fn render_affiliation(
    writer: &mut Writer<Vec<u8>>,
    prefix: &str,
    record: &Record,
) -> Result<(), Error> {
    if let Some(department) = field_str(record, "department-name") {
        leaf(writer, &format!("{}:department-name", prefix), &department)?;
    }
    if let Some(role) = field_str(record, "role-title") {
        leaf(writer, &format!("{}:role-title", prefix), &role)?;
    }
    render_organization(writer, &format!("{}:organization", prefix), record)
}

fn render_peer_review(writer: &mut Writer<Vec<u8>>, record: &Record) -> Result<(), Error> {
    if let Some(role) = field_str(record, "reviewer-role") {
        leaf(writer, "peer-review:reviewer-role", &role)?;
    }
    if let Some(kind) = field_str(record, "review-type") {
        leaf(writer, "peer-review:review-type", &kind)?;
    }
    if let Some(group) = field_str(record, "review-group-id") {
        leaf(writer, "peer-review:review-group-id", &group)?;
    }
    render_external_ids(writer, record)
}

fn render_external_ids(writer: &mut Writer<Vec<u8>>, record: &Record) -> Result<(), Error> {
    let Some(ids) = record
        .get("external-ids")
        .and_then(|v| v.get("external-id"))
        .and_then(Value::as_array)
    else {
        return Ok(());
    };

    start(writer, "common:external-ids")?;
    for id in ids {
        start(writer, "common:external-id")?;
        for key in ["external-id-type", "external-id-value", "external-id-relationship"] {
            if let Some(text) = id.get(key).and_then(Value::as_str) {
                leaf(writer, &format!("common:{}", key), text)?;
            }
        }
        end(writer, "common:external-id")?;
    }
    end(writer, "common:external-ids")
}

fn render_organization(
    writer: &mut Writer<Vec<u8>>,
    elem_name: &str,
    record: &Record,
) -> Result<(), Error> {
    let Some(org) = record.get("organization") else {
        return Ok(());
    };

    start(writer, elem_name)?;
    if let Some(name) = org.get("name").and_then(Value::as_str) {
        leaf(writer, "common:name", name)?;
    }
    if let Some(address) = org.get("address") {
        start(writer, "common:address")?;
        for key in ["city", "region", "country"] {
            if let Some(text) = address.get(key).and_then(Value::as_str) {
                leaf(writer, &format!("common:{}", key), text)?;
            }
        }
        end(writer, "common:address")?;
    }
    end(writer, elem_name)
}

fn start(writer: &mut Writer<Vec<u8>>, name: &str) -> Result<(), Error> {
    writer
        .write_event(Event::Start(BytesStart::new(name.to_string())))
        .map_err(xml_err)
}

fn end(writer: &mut Writer<Vec<u8>>, name: &str) -> Result<(), Error> {
    writer
        .write_event(Event::End(BytesEnd::new(name.to_string())))
        .map_err(xml_err)
}

fn leaf(writer: &mut Writer<Vec<u8>>, name: &str, text: &str) -> Result<(), Error> {
    start(writer, name)?;
    writer
        .write_event(Event::Text(BytesText::new(text)))
        .map_err(xml_err)?;
    end(writer, name)
}

/// The record title, accepting both the flat string form and the nested
/// `{"title": {"title": {"value": ...}}}` schema form.
fn title_of(record: &Record) -> Option<String> {
    match record.get("title") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Object(_)) => nested_str(record, &["title", "title", "value"])
            .or_else(|| nested_str(record, &["title", "title"])),
        _ => None,
    }
}

fn field_str(record: &Record, key: &str) -> Option<String> {
    record.get(key).and_then(Value::as_str).map(str::to_string)
}

fn nested_str(record: &Record, path: &[&str]) -> Option<String> {
    let mut value = record.get(path[0])?;
    for key in &path[1..] {
        value = value.get(key)?;
    }
    value.as_str().map(str::to_string)
}
