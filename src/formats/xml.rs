// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! XML codec.
//!
//! Decoding yields the content of the document's root element as a Tree:
//!
//! - child elements become object keys; repeated tags become arrays
//! - attributes become `@name` keys
//! - a leaf element (no children, no attributes) becomes its trimmed text
//! - text inside an element that also has children or attributes is kept
//!   under `#text`
//!
//! Encoding reverses the mapping inside a `<root>` wrapper. Top-level arrays
//! (records) are written as repeated `<item>` elements, and a root whose only
//! children are `<item>` elements decodes back to an array.

use std::io::{Read, Write};

use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde_json::{Map, Value as JsonValue};

use super::codec::FormatCodec;
use super::json::value_to_tree;
use crate::core::{cell_text, DataValue, OmniError, Result};
use crate::io::Endpoint;

const NAME: &str = "xml";
const ROOT_TAG: &str = "root";
const ITEM_TAG: &str = "item";
const TEXT_KEY: &str = "#text";

/// XML codec.
#[derive(Debug, Default, Clone, Copy)]
pub struct XmlCodec;

impl XmlCodec {
    pub fn new() -> Self {
        Self
    }
}

#[derive(Debug, Default)]
struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<Element>,
}

impl Element {
    fn from_start(start: &BytesStart<'_>) -> Result<Self> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| OmniError::decode(NAME, e.to_string()))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map_err(|e| OmniError::decode(NAME, e.to_string()))?;
            attributes.push((key, value.into_owned()));
        }
        Ok(Self {
            name,
            attributes,
            ..Default::default()
        })
    }

    fn into_value(self) -> JsonValue {
        if self.children.is_empty() && self.attributes.is_empty() {
            return JsonValue::String(self.text.trim().to_string());
        }

        let mut obj = Map::new();
        for (key, value) in self.attributes {
            obj.insert(format!("@{key}"), JsonValue::String(value));
        }
        for child in self.children {
            let name = child.name.clone();
            let value = child.into_value();
            match obj.get_mut(&name) {
                None => {
                    obj.insert(name, value);
                }
                Some(JsonValue::Array(items)) => items.push(value),
                Some(existing) => {
                    let first = existing.take();
                    *existing = JsonValue::Array(vec![first, value]);
                }
            }
        }
        let text = self.text.trim();
        if !text.is_empty() {
            obj.insert(TEXT_KEY.to_string(), JsonValue::String(text.to_string()));
        }
        JsonValue::Object(obj)
    }
}

fn attach(stack: &mut Vec<Element>, root: &mut Option<Element>, element: Element) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
        return Ok(());
    }
    if root.is_some() {
        return Err(OmniError::decode(NAME, "multiple root elements"));
    }
    *root = Some(element);
    Ok(())
}

fn parse_document(text: &str) -> Result<Element> {
    let mut reader = Reader::from_str(text);
    reader.trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let event = reader.read_event().map_err(|e| {
            OmniError::decode(
                NAME,
                format!("at byte {}: {e}", reader.buffer_position()),
            )
        })?;

        match event {
            Event::Start(start) => stack.push(Element::from_start(&start)?),
            Event::Empty(start) => {
                let element = Element::from_start(&start)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| OmniError::decode(NAME, "unbalanced closing tag"))?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(text) => {
                let text = text
                    .unescape()
                    .map_err(|e| OmniError::decode(NAME, e.to_string()))?;
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&text);
                }
            }
            Event::CData(data) => {
                if let Some(current) = stack.last_mut() {
                    current
                        .text
                        .push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Event::Eof => break,
            // Declarations, comments and processing instructions
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(OmniError::decode(NAME, "unexpected end of document"));
    }
    root.ok_or_else(|| OmniError::decode(NAME, "document has no root element"))
}

/// A root holding nothing but `<item>` children is a record list.
fn unwrap_items(tree: JsonValue) -> JsonValue {
    match tree {
        JsonValue::Object(obj) if obj.len() == 1 && obj.contains_key(ITEM_TAG) => {
            match obj.into_iter().next() {
                Some((_, JsonValue::Array(items))) => JsonValue::Array(items),
                Some((_, single)) => JsonValue::Array(vec![single]),
                None => JsonValue::Array(Vec::new()),
            }
        }
        other => other,
    }
}

/// Make a key usable as an element name.
fn tag_name(key: &str) -> String {
    let mut name: String = key
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '_' | '-' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if !name
        .chars()
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
    {
        name.insert(0, '_');
    }
    name
}

fn write_element(out: &mut String, name: &str, value: &JsonValue, depth: usize) {
    let indent = "  ".repeat(depth);
    match value {
        JsonValue::Array(items) => {
            for item in items {
                write_element(out, name, item, depth);
            }
        }
        JsonValue::Object(map) => {
            out.push_str(&indent);
            out.push('<');
            out.push_str(name);
            for (key, attr) in map {
                if let Some(attr_name) = key.strip_prefix('@') {
                    out.push_str(&format!(
                        " {}=\"{}\"",
                        tag_name(attr_name),
                        escape(&cell_text(attr))
                    ));
                }
            }

            let text = map.get(TEXT_KEY).map(cell_text).unwrap_or_default();
            let children: Vec<_> = map
                .iter()
                .filter(|(key, _)| !key.starts_with('@') && key.as_str() != TEXT_KEY)
                .collect();

            if children.is_empty() && text.is_empty() {
                out.push_str("/>\n");
                return;
            }

            out.push('>');
            out.push_str(&escape(&text));
            if !children.is_empty() {
                out.push('\n');
                for (key, child) in children {
                    write_element(out, &tag_name(key), child, depth + 1);
                }
                out.push_str(&indent);
            }
            out.push_str(&format!("</{name}>\n"));
        }
        JsonValue::Null => out.push_str(&format!("{indent}<{name}/>\n")),
        leaf => out.push_str(&format!(
            "{indent}<{name}>{}</{name}>\n",
            escape(&cell_text(leaf))
        )),
    }
}

impl FormatCodec for XmlCodec {
    fn name(&self) -> &'static str {
        NAME
    }

    fn decode(&self, input: &mut dyn Read, _origin: &Endpoint) -> Result<DataValue> {
        let mut text = String::new();
        input
            .read_to_string(&mut text)
            .map_err(|e| OmniError::decode(NAME, e.to_string()))?;
        let root = parse_document(&text)?;
        Ok(DataValue::Tree(unwrap_items(root.into_value())))
    }

    fn encode(&self, value: &DataValue, output: &mut dyn Write, _target: &Endpoint) -> Result<()> {
        let tree = value_to_tree(value);
        let mut doc = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");

        match &tree {
            JsonValue::Array(items) => {
                doc.push_str(&format!("<{ROOT_TAG}>\n"));
                for item in items {
                    write_element(&mut doc, ITEM_TAG, item, 1);
                }
                doc.push_str(&format!("</{ROOT_TAG}>\n"));
            }
            other => write_element(&mut doc, ROOT_TAG, other, 0),
        }

        output.write_all(doc.as_bytes())?;
        output.flush()?;
        Ok(())
    }
}
