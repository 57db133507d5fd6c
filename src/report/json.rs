// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Machine-readable JSON report.
//!
//! Schemas serialize with their own field names (`type` for the inferred
//! type). Length and sample fields are dropped unless stats are requested.

use serde::Serialize;
use serde_json::{json, Value as JsonValue};

use super::{summary_line, Renderer};
use crate::core::{OmniError, Result};
use crate::inspect::{PeekReport, Preview};
use crate::schema::{Schema, SchemaDiff};

/// JSON renderer.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonRenderer;

fn to_json<T: Serialize>(value: &T) -> Result<JsonValue> {
    serde_json::to_value(value).map_err(|e| OmniError::encode("json", e.to_string()))
}

fn pretty(value: &JsonValue) -> Result<String> {
    let mut out =
        serde_json::to_string_pretty(value).map_err(|e| OmniError::encode("json", e.to_string()))?;
    out.push('\n');
    Ok(out)
}

fn schema_value(schema: &Schema, source: &str, stats: bool) -> Result<JsonValue> {
    let mut value = to_json(schema)?;
    if !stats {
        if let Some(columns) = value.get_mut("columns").and_then(JsonValue::as_array_mut) {
            for column in columns.iter_mut().filter_map(JsonValue::as_object_mut) {
                column.remove("min_length");
                column.remove("max_length");
                column.remove("sample_values");
            }
        }
    }
    if let Some(obj) = value.as_object_mut() {
        obj.insert("source".to_string(), JsonValue::String(source.to_string()));
    }
    Ok(value)
}

impl Renderer for JsonRenderer {
    fn name(&self) -> &'static str {
        "json"
    }

    fn render(&self, schema: &Schema, source: &str, stats: bool) -> Result<String> {
        pretty(&schema_value(schema, source, stats)?)
    }

    fn render_preview(&self, preview: &Preview) -> Result<String> {
        pretty(&to_json(preview)?)
    }

    fn render_peek(&self, report: &PeekReport, stats: bool) -> Result<String> {
        pretty(&json!({
            "schema": schema_value(&report.schema, &report.source, stats)?,
            "preview": to_json(&report.preview)?,
        }))
    }

    fn render_diff(
        &self,
        diff: &SchemaDiff,
        schema1: &Schema,
        schema2: &Schema,
        source1: &str,
        source2: &str,
    ) -> Result<String> {
        pretty(&json!({
            "file1": schema_value(schema1, source1, false)?,
            "file2": schema_value(schema2, source2, false)?,
            "diff": to_json(diff)?,
            "summary": summary_line(diff),
        }))
    }
}
