//! HL7 JSON/XML mapping rules
//!
//! - Root element carries the `resourceType` name and the FHIR namespace.
//! - Primitive values live in `value` attributes.
//! - Primitive metadata (`id`, `extension`) travels in `_field` companions,
//!   aligned with null padding when the field repeats.
//! - Arrays become repeated elements.
//! - Narrative xhtml passes through verbatim in both directions.

use crate::error::{CodecError, Result};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use serde_json::map::Entry;
use serde_json::{Map, Value};
use std::io::Cursor;

const FHIR_NS: &str = "http://hl7.org/fhir";
const XHTML_NS: &str = "http://www.w3.org/1999/xhtml";

pub(crate) fn to_xml(resource: &Value, pretty: bool) -> Result<String> {
    let obj = resource
        .as_object()
        .ok_or_else(|| CodecError::Parse {
            encoding: crate::EncodingKind::Xml,
            reason: "expected a JSON object for the resource".into(),
        })?;
    let resource_type = obj
        .get("resourceType")
        .and_then(Value::as_str)
        .ok_or(CodecError::MissingResourceType)?;

    let cursor = Cursor::new(Vec::new());
    let mut emitter = Emitter {
        writer: if pretty {
            Writer::new_with_indent(cursor, b' ', 2)
        } else {
            Writer::new(cursor)
        },
    };

    let mut root = BytesStart::new(resource_type);
    root.push_attribute(("xmlns", FHIR_NS));
    emitter.writer.write_event(Event::Start(root))?;
    emitter.object_body(obj, &["resourceType"])?;
    emitter
        .writer
        .write_event(Event::End(BytesEnd::new(resource_type)))?;

    let bytes = emitter.writer.into_inner().into_inner();
    Ok(String::from_utf8(bytes)?)
}

pub(crate) fn from_xml(input: &str) -> Result<Value> {
    let doc = roxmltree::Document::parse(input)?;
    let root = doc.root_element();

    let mut map = Map::new();
    map.insert(
        "resourceType".to_string(),
        Value::String(root.tag_name().name().to_string()),
    );

    let mut fields = Map::new();
    for child in root.children().filter(|n| n.is_element()) {
        let name = child.tag_name().name().to_string();
        let (value, companion) = node_to_value(input, &child)?;
        append_property(&mut fields, &name, value, companion);
    }
    map.extend(fields);

    Ok(Value::Object(map))
}

struct Emitter {
    writer: Writer<Cursor<Vec<u8>>>,
}

impl Emitter {
    /// Write the fields of an object, pairing each with its `_field`
    /// companion. Companions without a value field still produce an
    /// element (extensions on an absent primitive).
    fn object_body(&mut self, obj: &Map<String, Value>, skip: &[&str]) -> Result<()> {
        for (name, value) in obj {
            if skip.contains(&name.as_str()) || name.starts_with('_') {
                continue;
            }
            let companion = obj.get(&format!("_{name}"));
            self.field(name, value, companion)?;
        }

        for (name, companion) in obj {
            let Some(bare) = name.strip_prefix('_') else {
                continue;
            };
            if !obj.contains_key(bare) {
                self.field(bare, &Value::Null, Some(companion))?;
            }
        }
        Ok(())
    }

    fn field(&mut self, name: &str, value: &Value, companion: Option<&Value>) -> Result<()> {
        match value {
            Value::Array(items) => {
                let companions = companion.and_then(Value::as_array);
                for (idx, item) in items.iter().enumerate() {
                    let item_companion = companions.and_then(|c| c.get(idx));
                    self.field(name, item, item_companion)?;
                }
                Ok(())
            }
            Value::Object(obj) => self.complex(name, obj),
            primitive => self.primitive(name, primitive, companion),
        }
    }

    fn complex(&mut self, name: &str, obj: &Map<String, Value>) -> Result<()> {
        let mut start = BytesStart::new(name);
        if let Some(Value::String(id)) = obj.get("id") {
            start.push_attribute(("id", id.as_str()));
        }
        self.writer.write_event(Event::Start(start))?;
        self.object_body(obj, &["id"])?;
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    fn primitive(&mut self, name: &str, value: &Value, companion: Option<&Value>) -> Result<()> {
        // narrative passes through as raw xhtml, not a value attribute
        if let Value::String(text) = value {
            if name == "div" && text.trim_start().starts_with('<') {
                self.writer
                    .write_event(Event::Text(BytesText::from_escaped(text.as_str())))?;
                return Ok(());
            }
        }

        let mut element = BytesStart::new(name);
        let has_value = !value.is_null();
        if has_value {
            element.push_attribute(("value", render_primitive(value).as_str()));
        }

        let meta = companion.and_then(Value::as_object);
        if let Some(Value::String(id)) = meta.and_then(|m| m.get("id")) {
            element.push_attribute(("id", id.as_str()));
        }
        let extensions = meta.and_then(|m| m.get("extension"));

        match (has_value, extensions) {
            (false, None) => Ok(()),
            (_, None) => {
                self.writer.write_event(Event::Empty(element))?;
                Ok(())
            }
            (_, Some(extension)) => {
                self.writer.write_event(Event::Start(element))?;
                self.field("extension", extension, None)?;
                self.writer.write_event(Event::End(BytesEnd::new(name)))?;
                Ok(())
            }
        }
    }
}

fn render_primitive(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Convert one element into its JSON value plus an optional `_field`
/// companion carrying primitive metadata.
fn node_to_value(source: &str, node: &roxmltree::Node) -> Result<(Value, Option<Value>)> {
    if node.tag_name().namespace() == Some(XHTML_NS) {
        let snippet = &source[node.range()];
        return Ok((Value::String(snippet.to_string()), None));
    }

    if let Some(raw) = node.attribute("value") {
        let mut meta = Map::new();
        if let Some(id) = node.attribute("id") {
            meta.insert("id".to_string(), Value::String(id.to_string()));
        }
        let mut extensions = Vec::new();
        for child in node.children().filter(|c| c.is_element()) {
            if child.tag_name().name() == "extension" {
                let (extension, _) = node_to_value(source, &child)?;
                extensions.push(extension);
            }
        }
        if !extensions.is_empty() {
            meta.insert("extension".to_string(), Value::Array(extensions));
        }

        let companion = (!meta.is_empty()).then(|| Value::Object(meta));
        return Ok((parse_primitive(raw), companion));
    }

    let mut obj = Map::new();
    if let Some(id) = node.attribute("id") {
        obj.insert("id".to_string(), Value::String(id.to_string()));
    }
    for child in node.children().filter(|c| c.is_element()) {
        let name = child.tag_name().name().to_string();
        let (value, companion) = node_to_value(source, &child)?;
        append_property(&mut obj, &name, value, companion);
    }
    Ok((Value::Object(obj), None))
}

/// Insert a property, promoting repeats to arrays and keeping the `_field`
/// companion array aligned with null padding.
fn append_property(
    target: &mut Map<String, Value>,
    name: &str,
    value: Value,
    companion: Option<Value>,
) {
    match target.entry(name.to_string()) {
        Entry::Vacant(slot) => {
            slot.insert(value);
        }
        Entry::Occupied(mut slot) => match slot.get_mut() {
            Value::Array(items) => items.push(value),
            single => {
                let first = single.take();
                *single = Value::Array(vec![first, value]);
            }
        },
    }

    let companion_key = format!("_{name}");
    if companion.is_none() && !target.contains_key(&companion_key) {
        return;
    }

    let occurrences = match target.get(name) {
        Some(Value::Array(items)) => items.len(),
        Some(_) => 1,
        None => 0,
    };
    let repeats = matches!(target.get(name), Some(Value::Array(_)));

    match target.entry(companion_key) {
        Entry::Vacant(slot) => {
            if let Some(meta) = companion {
                if repeats {
                    let mut aligned = vec![Value::Null; occurrences.saturating_sub(1)];
                    aligned.push(meta);
                    slot.insert(Value::Array(aligned));
                } else {
                    slot.insert(meta);
                }
            }
        }
        Entry::Occupied(mut slot) => match slot.get_mut() {
            Value::Array(aligned) => {
                while aligned.len() + 1 < occurrences {
                    aligned.push(Value::Null);
                }
                aligned.push(companion.unwrap_or(Value::Null));
            }
            single => {
                if repeats {
                    let first = single.take();
                    let mut aligned = vec![first];
                    while aligned.len() + 1 < occurrences {
                        aligned.push(Value::Null);
                    }
                    aligned.push(companion.unwrap_or(Value::Null));
                    *single = Value::Array(aligned);
                } else if let Some(meta) = companion {
                    *single = meta;
                }
            }
        },
    }
}

fn parse_primitive(raw: &str) -> Value {
    match raw {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        other => match other.parse::<i64>() {
            Ok(int) => Value::Number(int.into()),
            Err(_) => Value::String(other.to_string()),
        },
    }
}
