// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! YAML codec.

use std::io::{Read, Write};

use serde_json::Value as JsonValue;

use super::codec::FormatCodec;
use super::json::value_to_tree;
use crate::core::{DataValue, OmniError, Result};
use crate::io::Endpoint;

const NAME: &str = "yaml";

/// YAML codec. Decodes to a Tree; encodes any shape in its tree view.
#[derive(Debug, Default, Clone, Copy)]
pub struct YamlCodec;

impl YamlCodec {
    pub fn new() -> Self {
        Self
    }
}

impl FormatCodec for YamlCodec {
    fn name(&self) -> &'static str {
        NAME
    }

    fn decode(&self, input: &mut dyn Read, _origin: &Endpoint) -> Result<DataValue> {
        let mut text = String::new();
        input
            .read_to_string(&mut text)
            .map_err(|e| OmniError::decode(NAME, e.to_string()))?;

        // An empty document is null
        if text.trim().is_empty() {
            return Ok(DataValue::Tree(JsonValue::Null));
        }

        let tree: JsonValue =
            serde_yaml::from_str(&text).map_err(|e| OmniError::decode(NAME, e.to_string()))?;
        Ok(DataValue::Tree(tree))
    }

    fn encode(&self, value: &DataValue, output: &mut dyn Write, _target: &Endpoint) -> Result<()> {
        serde_yaml::to_writer(&mut *output, &value_to_tree(value))
            .map_err(|e| OmniError::encode(NAME, e.to_string()))?;
        output.flush()?;
        Ok(())
    }
}
