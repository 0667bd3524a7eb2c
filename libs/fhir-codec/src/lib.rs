//! FHIR wire-format codec
//!
//! Converts between the two wire encodings (JSON, XML) and in-memory
//! [`serde_json::Value`] documents, resolving the encoding from an explicit
//! hint or a content guess. The per-encoding engines are constructed lazily
//! on first use; construction is idempotent under concurrent first calls, so
//! a shared [`FhirCodec`] can be handed to any number of test threads.

mod encoding;
mod error;
mod quirks;
mod xml;

pub use encoding::EncodingKind;
pub use error::{CodecError, Result};

use serde_json::Value;
use std::sync::OnceLock;

/// Stateless JSON/XML codec with lazily built engines.
#[derive(Default)]
pub struct FhirCodec {
    xml_engine: OnceLock<XmlEngine>,
    json_engine: OnceLock<JsonEngine>,
}

impl FhirCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode with the encoding guessed from the content.
    pub fn decode(&self, content: &str) -> Result<Value> {
        self.decode_with(content, None, None)
    }

    /// Decode and require the given `resourceType`.
    pub fn decode_as(&self, content: &str, expected_type: &str) -> Result<Value> {
        self.decode_with(content, Some(expected_type), None)
    }

    /// Decode with an optional expected type and an optional explicit
    /// encoding. Without the hint the encoding is guessed from content.
    pub fn decode_with(
        &self,
        content: &str,
        expected_type: Option<&str>,
        encoding: Option<EncodingKind>,
    ) -> Result<Value> {
        let encoding = encoding.unwrap_or_else(|| EncodingKind::guess_from_content(content));
        let content = quirks::apply_decode_fixes(content);

        let resource = match encoding {
            EncodingKind::Json => self.json().read(&content)?,
            EncodingKind::Xml => self.xml().read(&content)?,
        };

        let actual = resource
            .get("resourceType")
            .and_then(Value::as_str)
            .ok_or(CodecError::MissingResourceType)?;
        if let Some(expected) = expected_type {
            if actual != expected {
                return Err(CodecError::UnexpectedResourceType {
                    expected: expected.to_string(),
                    actual: actual.to_string(),
                });
            }
        }

        tracing::trace!(%encoding, resource_type = actual, "decoded resource");
        Ok(resource)
    }

    pub fn encode(&self, resource: &Value, encoding: EncodingKind) -> Result<String> {
        self.encode_with(resource, encoding, false)
    }

    pub fn encode_pretty(&self, resource: &Value, encoding: EncodingKind) -> Result<String> {
        self.encode_with(resource, encoding, true)
    }

    pub fn encode_with(
        &self,
        resource: &Value,
        encoding: EncodingKind,
        pretty: bool,
    ) -> Result<String> {
        let encoded = match encoding {
            EncodingKind::Json => self.json().write(resource, pretty)?,
            EncodingKind::Xml => self.xml().write(resource, pretty)?,
        };

        Ok(quirks::apply_encode_fixes(resource, encoded))
    }

    fn xml(&self) -> &XmlEngine {
        self.xml_engine.get_or_init(XmlEngine::new)
    }

    fn json(&self) -> &JsonEngine {
        self.json_engine.get_or_init(JsonEngine::new)
    }
}

/// XML reader/writer engine.
struct XmlEngine;

impl XmlEngine {
    fn new() -> Self {
        tracing::debug!("constructing XML engine");
        Self
    }

    fn read(&self, content: &str) -> Result<Value> {
        xml::from_xml(content).map_err(|err| match err {
            CodecError::Xml(parse) => CodecError::Parse {
                encoding: EncodingKind::Xml,
                reason: parse.to_string(),
            },
            other => other,
        })
    }

    fn write(&self, resource: &Value, pretty: bool) -> Result<String> {
        xml::to_xml(resource, pretty)
    }
}

/// JSON reader/writer engine.
struct JsonEngine;

impl JsonEngine {
    fn new() -> Self {
        tracing::debug!("constructing JSON engine");
        Self
    }

    fn read(&self, content: &str) -> Result<Value> {
        serde_json::from_str(content).map_err(|err| CodecError::Parse {
            encoding: EncodingKind::Json,
            reason: err.to_string(),
        })
    }

    fn write(&self, resource: &Value, pretty: bool) -> Result<String> {
        if pretty {
            Ok(serde_json::to_string_pretty(resource)?)
        } else {
            Ok(serde_json::to_string(resource)?)
        }
    }
}
