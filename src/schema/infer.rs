// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Schema inference.
//!
//! [`SchemaInferencer`] dispatches on the [`ValueShape`] of a decoded value,
//! one [`InferenceStrategy`] per shape:
//!
//! - **Table**: row 0 is the header. Column types come from parsing cell
//!   text; see [`TypeState`].
//! - **Tree**: an object or an array of objects. Types come from the JSON
//!   kind of each value. An array of primitives becomes one `value` column.
//! - **SheetSet**: the first sheet in lexical order, inferred as a table,
//!   with column names prefixed `<sheet>.`.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::core::{cell_text, DataValue, OmniError, RecordKeys, Result, Table, ValueShape};

/// Minimum number of data rows scanned before a table column's type is final.
pub const MIN_SAMPLE_ROWS: usize = 1000;

/// Maximum number of sample values kept per column.
pub const MAX_SAMPLES: usize = 5;

/// Inferred column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    String,
    Number,
    Boolean,
    Null,
    Array,
    Object,
}

impl ColumnType {
    /// Structural type of a tree value.
    pub fn of(value: &JsonValue) -> Self {
        match value {
            JsonValue::Null => ColumnType::Null,
            JsonValue::Bool(_) => ColumnType::Boolean,
            JsonValue::Number(_) => ColumnType::Number,
            JsonValue::String(_) => ColumnType::String,
            JsonValue::Array(_) => ColumnType::Array,
            JsonValue::Object(_) => ColumnType::Object,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::String => "string",
            ColumnType::Number => "number",
            ColumnType::Boolean => "boolean",
            ColumnType::Null => "null",
            ColumnType::Array => "array",
            ColumnType::Object => "object",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One inferred column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub inferred_type: ColumnType,
    pub nullable: bool,
    /// Shortest cell, in characters (table origin only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    /// Longest cell, in characters (table origin only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    /// Up to [`MAX_SAMPLES`] non-empty values, in order of appearance
    pub sample_values: Vec<String>,
}

impl ColumnInfo {
    fn new(name: String, inferred_type: ColumnType) -> Self {
        Self {
            name,
            inferred_type,
            nullable: false,
            min_length: None,
            max_length: None,
            sample_values: Vec::new(),
        }
    }

    fn push_sample(&mut self, value: String) {
        if self.sample_values.len() < MAX_SAMPLES && !value.is_empty() {
            self.sample_values.push(value);
        }
    }
}

/// Inferred structure of a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub source_format: String,
    pub row_count: usize,
    pub column_count: usize,
    pub columns: Vec<ColumnInfo>,
}

impl Schema {
    /// Schema with no rows and no columns.
    pub fn empty(source_format: impl Into<String>) -> Self {
        Self {
            source_format: source_format.into(),
            row_count: 0,
            column_count: 0,
            columns: Vec::new(),
        }
    }

    fn new(source_format: &str, row_count: usize, columns: Vec<ColumnInfo>) -> Self {
        Self {
            source_format: source_format.to_string(),
            row_count,
            column_count: columns.len(),
            columns,
        }
    }

    /// Find a column by exact name.
    pub fn column(&self, name: &str) -> Option<&ColumnInfo> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Column names in order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }
}

/// Inference tuning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InferenceOptions {
    /// Data rows scanned per table; `None` scans every row
    pub sample_rows: Option<usize>,
}

impl InferenceOptions {
    /// Bound the scan to `rows` data rows, never fewer than
    /// [`MIN_SAMPLE_ROWS`]. Zero scans every row.
    pub fn with_sample_rows(rows: usize) -> Self {
        let sample_rows = (rows > 0).then(|| rows.max(MIN_SAMPLE_ROWS));
        Self { sample_rows }
    }
}

/// Inference for one value shape.
pub trait InferenceStrategy: Send + Sync {
    /// Infer a schema for `value`, which has this strategy's shape.
    fn infer(&self, value: &DataValue, origin: &str, options: &InferenceOptions) -> Result<Schema>;
}

/// Type of a table column, refined one cell at a time.
///
/// ```text
/// Unknown --number--> Number --number--> Number
/// Unknown --bool----> Boolean --bool---> Boolean
/// anything else --------------------------> String (absorbing)
/// ```
///
/// Empty cells do not move the state. A column that never saw a non-empty
/// cell is reported as `string`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeState {
    #[default]
    Unknown,
    Number,
    Boolean,
    String,
}

impl TypeState {
    /// Next state after observing a non-empty cell.
    pub fn observe(self, cell: &str) -> Self {
        let is_number = cell.parse::<f64>().is_ok();
        let is_bool = cell.eq_ignore_ascii_case("true") || cell.eq_ignore_ascii_case("false");

        match (self, is_number, is_bool) {
            (TypeState::String, _, _) => TypeState::String,
            (TypeState::Unknown | TypeState::Number, true, _) => TypeState::Number,
            (TypeState::Unknown | TypeState::Boolean, _, true) => TypeState::Boolean,
            _ => TypeState::String,
        }
    }

    pub fn column_type(self) -> ColumnType {
        match self {
            TypeState::Number => ColumnType::Number,
            TypeState::Boolean => ColumnType::Boolean,
            TypeState::Unknown | TypeState::String => ColumnType::String,
        }
    }
}

/// Infer a table's columns.
fn infer_table(
    table: &Table,
    origin: &str,
    prefix: Option<&str>,
    options: &InferenceOptions,
) -> Schema {
    let Some(header) = table.header() else {
        return Schema::empty(origin);
    };

    let names = RecordKeys::new(header).into_keys();
    let mut columns: Vec<ColumnInfo> = names
        .into_iter()
        .map(|name| {
            let name = match prefix {
                Some(p) => format!("{p}.{name}"),
                None => name,
            };
            ColumnInfo::new(name, ColumnType::String)
        })
        .collect();
    let mut states = vec![TypeState::Unknown; columns.len()];

    let limit = options.sample_rows.unwrap_or(usize::MAX);
    for row in table.data_rows().iter().take(limit) {
        for (idx, (column, state)) in columns.iter_mut().zip(states.iter_mut()).enumerate() {
            // Missing trailing cells count as empty
            let cell = row.get(idx).map(String::as_str).unwrap_or("");

            let len = cell.chars().count();
            column.min_length = Some(column.min_length.map_or(len, |m| m.min(len)));
            column.max_length = Some(column.max_length.map_or(len, |m| m.max(len)));

            if cell.is_empty() {
                column.nullable = true;
                continue;
            }
            *state = state.observe(cell);
            column.push_sample(cell.to_string());
        }
    }

    for (column, state) in columns.iter_mut().zip(states) {
        column.inferred_type = state.column_type();
    }

    Schema::new(origin, table.data_row_count(), columns)
}

/// Strategy for [`ValueShape::Table`].
#[derive(Debug, Default)]
pub struct TableStrategy;

impl InferenceStrategy for TableStrategy {
    fn infer(&self, value: &DataValue, origin: &str, options: &InferenceOptions) -> Result<Schema> {
        let table = value
            .as_table()
            .ok_or_else(|| OmniError::inference(origin, "expected a table"))?;
        Ok(infer_table(table, origin, None, options))
    }
}

/// Strategy for [`ValueShape::SheetSet`].
#[derive(Debug, Default)]
pub struct SheetSetStrategy;

impl InferenceStrategy for SheetSetStrategy {
    fn infer(&self, value: &DataValue, origin: &str, options: &InferenceOptions) -> Result<Schema> {
        let sheets = value
            .as_sheet_set()
            .ok_or_else(|| OmniError::inference(origin, "expected a sheet set"))?;

        // BTreeMap: first entry is the lexically smallest sheet name
        match sheets.iter().next() {
            Some((name, table)) => Ok(infer_table(table, origin, Some(name), options)),
            None => Ok(Schema::empty(origin)),
        }
    }
}

/// Strategy for [`ValueShape::Tree`].
#[derive(Debug, Default)]
pub struct TreeStrategy;

impl TreeStrategy {
    fn infer_records(
        origin: &str,
        first: &Map<String, JsonValue>,
        items: &[JsonValue],
    ) -> Result<Schema> {
        let mut columns: Vec<ColumnInfo> = first
            .iter()
            .map(|(key, value)| ColumnInfo::new(key.clone(), ColumnType::of(value)))
            .collect();

        for (i, item) in items.iter().enumerate() {
            let obj = item.as_object().ok_or_else(|| {
                OmniError::inference(
                    origin,
                    format!(
                        "array mixes objects with {} values (element {i})",
                        ColumnType::of(item)
                    ),
                )
            })?;
            for column in &mut columns {
                match obj.get(&column.name) {
                    None | Some(JsonValue::Null) => column.nullable = true,
                    Some(value) => column.push_sample(cell_text(value)),
                }
            }
        }

        Ok(Schema::new(origin, items.len(), columns))
    }

    fn infer_primitives(origin: &str, first: &JsonValue, items: &[JsonValue]) -> Schema {
        let mut column = ColumnInfo::new("value".to_string(), ColumnType::of(first));
        for item in items {
            if item.is_null() {
                column.nullable = true;
            } else {
                column.push_sample(cell_text(item));
            }
        }
        Schema::new(origin, items.len(), vec![column])
    }
}

impl InferenceStrategy for TreeStrategy {
    fn infer(&self, value: &DataValue, origin: &str, _options: &InferenceOptions) -> Result<Schema> {
        let tree = value
            .as_tree()
            .ok_or_else(|| OmniError::inference(origin, "expected a tree"))?;

        match tree {
            JsonValue::Array(items) => match items.first() {
                None => Ok(Schema::empty(origin)),
                Some(JsonValue::Object(first)) => Self::infer_records(origin, first, items),
                Some(first) => Ok(Self::infer_primitives(origin, first, items)),
            },
            JsonValue::Object(obj) => {
                let columns = obj
                    .iter()
                    .map(|(key, value)| {
                        let mut column = ColumnInfo::new(key.clone(), ColumnType::of(value));
                        column.nullable = value.is_null();
                        column.push_sample(cell_text(value));
                        column
                    })
                    .collect();
                Ok(Schema::new(origin, 1, columns))
            }
            other => Err(OmniError::inference(
                origin,
                format!(
                    "expected an object or an array, found a {} value",
                    ColumnType::of(other)
                ),
            )),
        }
    }
}

/// Infers schemas, dispatching on value shape.
pub struct SchemaInferencer {
    strategies: HashMap<ValueShape, Box<dyn InferenceStrategy>>,
    options: InferenceOptions,
}

impl Default for SchemaInferencer {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaInferencer {
    /// Create an inferencer with the built-in strategy for every shape.
    pub fn new() -> Self {
        let mut strategies: HashMap<ValueShape, Box<dyn InferenceStrategy>> = HashMap::new();
        strategies.insert(ValueShape::Table, Box::new(TableStrategy));
        strategies.insert(ValueShape::Tree, Box::new(TreeStrategy));
        strategies.insert(ValueShape::SheetSet, Box::new(SheetSetStrategy));
        Self {
            strategies,
            options: InferenceOptions::default(),
        }
    }

    /// Create an inferencer with no strategies registered.
    pub fn empty() -> Self {
        Self {
            strategies: HashMap::new(),
            options: InferenceOptions::default(),
        }
    }

    pub fn with_options(mut self, options: InferenceOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &InferenceOptions {
        &self.options
    }

    /// Register or replace the strategy for a shape.
    pub fn register(&mut self, shape: ValueShape, strategy: Box<dyn InferenceStrategy>) {
        self.strategies.insert(shape, strategy);
    }

    /// Infer the schema of `value`, decoded from `origin`.
    ///
    /// # Errors
    ///
    /// Returns [`OmniError::SchemaInference`] if no strategy handles the
    /// value's shape or the value's structure is not tabular.
    pub fn infer(&self, value: &DataValue, origin: &str) -> Result<Schema> {
        let shape = value.shape();
        let strategy = self.strategies.get(&shape).ok_or_else(|| {
            OmniError::inference(origin, format!("no inference strategy for {shape} values"))
        })?;
        strategy.infer(value, origin, &self.options)
    }
}
