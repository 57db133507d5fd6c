// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Generic dataset value.
//!
//! Every codec decodes into a [`DataValue`] and encodes from one. The value is a
//! tagged union over the three shapes codecs exchange:
//!
//! - **Table**: ordered rows of string cells, the first row being the header
//! - **Tree**: nested maps and sequences (JSON/YAML/XML), backed by an
//!   order-preserving [`serde_json::Value`]
//! - **SheetSet**: sheet name -> Table, iterated in lexical sheet order
//!
//! Codecs match on the variant exhaustively and reject shapes they cannot
//! represent with [`OmniError::TypeMismatch`](crate::OmniError::TypeMismatch).

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use super::error::{OmniError, Result};

/// Nested key/value data as produced by JSON, YAML and XML decoders.
pub type Tree = JsonValue;

/// Named sheets in lexical order.
pub type SheetSet = BTreeMap<String, Table>;

/// Variant tag of a [`DataValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueShape {
    /// Rows of string cells
    Table,
    /// Nested maps and sequences
    Tree,
    /// Named tables
    SheetSet,
}

impl fmt::Display for ValueShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueShape::Table => write!(f, "table"),
            ValueShape::Tree => write!(f, "tree"),
            ValueShape::SheetSet => write!(f, "sheet set"),
        }
    }
}

/// Ordered rows of ordered string cells. Row 0 is the header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Create a table from raw rows (header first).
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// Create a table from a header and data rows.
    pub fn with_header(header: Vec<String>, data: Vec<Vec<String>>) -> Self {
        let mut rows = Vec::with_capacity(data.len() + 1);
        rows.push(header);
        rows.extend(data);
        Self { rows }
    }

    /// All rows including the header.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Consume the table and return its rows.
    pub fn into_rows(self) -> Vec<Vec<String>> {
        self.rows
    }

    /// Header row, if the table is not empty.
    pub fn header(&self) -> Option<&[String]> {
        self.rows.first().map(Vec::as_slice)
    }

    /// Rows after the header.
    pub fn data_rows(&self) -> &[Vec<String>] {
        self.rows.get(1..).unwrap_or(&[])
    }

    /// Number of rows after the header.
    pub fn data_row_count(&self) -> usize {
        self.rows.len().saturating_sub(1)
    }

    /// Check whether the table has no rows at all (not even a header).
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Convert to records: an array of objects keyed by header.
    ///
    /// Keys come from [`RecordKeys`]: repeated header names get a numeric
    /// suffix, and empty names or cells beyond the header width are keyed
    /// `column_<n>` (1-based), so no cell is dropped. Cells missing from
    /// short rows become empty strings.
    pub fn to_records(&self) -> Tree {
        let Some(header) = self.header() else {
            return JsonValue::Array(Vec::new());
        };

        let mut keys = RecordKeys::new(header);
        let records = self
            .data_rows()
            .iter()
            .map(|row| JsonValue::Object(keys.record(row)))
            .collect();

        JsonValue::Array(records)
    }

    /// Build a table from records.
    ///
    /// Accepts an array of flat objects or a single object (one row). The
    /// header is the union of keys in order of first appearance. Scalars are
    /// rendered as text, null as an empty cell, nested values as compact JSON.
    pub fn from_records(format: &str, tree: &Tree) -> Result<Self> {
        let items: Vec<&Map<String, JsonValue>> = match tree {
            JsonValue::Array(items) => items
                .iter()
                .map(|item| {
                    item.as_object()
                        .ok_or_else(|| records_mismatch(format))
                })
                .collect::<Result<_>>()?,
            JsonValue::Object(obj) => vec![obj],
            _ => return Err(records_mismatch(format)),
        };

        if items.is_empty() {
            return Ok(Table::default());
        }

        let mut header: Vec<String> = Vec::new();
        for obj in &items {
            for key in obj.keys() {
                if !header.iter().any(|h| h == key) {
                    header.push(key.clone());
                }
            }
        }

        let data = items
            .iter()
            .map(|obj| {
                header
                    .iter()
                    .map(|key| obj.get(key).map(cell_text).unwrap_or_default())
                    .collect()
            })
            .collect();

        Ok(Table::with_header(header, data))
    }
}

/// Unique, non-empty object keys for table columns.
///
/// Column `i` is keyed by its header name. An empty name, or a column past
/// the header, becomes `column_<i + 1>`. A name already taken gets `_2`,
/// `_3`, ... appended. Keys depend only on the header and the column index,
/// so a table converted whole and one streamed row by row get the same keys.
#[derive(Debug, Clone, Default)]
pub struct RecordKeys {
    keys: Vec<String>,
    taken: HashSet<String>,
    header_width: usize,
}

impl RecordKeys {
    pub fn new(header: &[String]) -> Self {
        let mut keys = Self {
            keys: Vec::with_capacity(header.len()),
            taken: HashSet::with_capacity(header.len()),
            header_width: header.len(),
        };
        for name in header {
            keys.push(name);
        }
        keys
    }

    /// Keys assigned so far, in column order.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn into_keys(self) -> Vec<String> {
        self.keys
    }

    fn push(&mut self, raw: &str) {
        let base = if raw.is_empty() {
            format!("column_{}", self.keys.len() + 1)
        } else {
            raw.to_string()
        };
        let mut name = base.clone();
        let mut n = 2;
        while !self.taken.insert(name.clone()) {
            name = format!("{base}_{n}");
            n += 1;
        }
        self.keys.push(name);
    }

    /// Key one row. The object covers the header width, or the row width
    /// when the row is longer.
    pub fn record(&mut self, row: &[String]) -> Map<String, JsonValue> {
        let width = self.header_width.max(row.len());
        while self.keys.len() < width {
            self.push("");
        }
        self.keys[..width]
            .iter()
            .enumerate()
            .map(|(i, key)| {
                let cell = row.get(i).cloned().unwrap_or_default();
                (key.clone(), JsonValue::String(cell))
            })
            .collect()
    }
}

fn records_mismatch(format: &str) -> OmniError {
    OmniError::type_mismatch(format, "an array of objects", ValueShape::Tree)
}

/// Render a tree leaf as cell text.
pub fn cell_text(value: &Tree) -> String {
    match value {
        JsonValue::Null => String::new(),
        JsonValue::String(s) => s.clone(),
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::Number(n) => n.to_string(),
        nested => nested.to_string(),
    }
}

/// Decoded dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DataValue {
    /// Rows of string cells
    Table(Table),
    /// Nested maps and sequences
    Tree(Tree),
    /// Named tables
    SheetSet(SheetSet),
}

impl DataValue {
    /// Variant tag.
    pub fn shape(&self) -> ValueShape {
        match self {
            DataValue::Table(_) => ValueShape::Table,
            DataValue::Tree(_) => ValueShape::Tree,
            DataValue::SheetSet(_) => ValueShape::SheetSet,
        }
    }

    /// Get as a table if this is a Table.
    pub fn as_table(&self) -> Option<&Table> {
        match self {
            DataValue::Table(t) => Some(t),
            _ => None,
        }
    }

    /// Get as a tree if this is a Tree.
    pub fn as_tree(&self) -> Option<&Tree> {
        match self {
            DataValue::Tree(t) => Some(t),
            _ => None,
        }
    }

    /// Get as a sheet set if this is a SheetSet.
    pub fn as_sheet_set(&self) -> Option<&SheetSet> {
        match self {
            DataValue::SheetSet(s) => Some(s),
            _ => None,
        }
    }
}

impl From<Table> for DataValue {
    fn from(table: Table) -> Self {
        DataValue::Table(table)
    }
}

impl From<Tree> for DataValue {
    fn from(tree: Tree) -> Self {
        DataValue::Tree(tree)
    }
}

impl From<SheetSet> for DataValue {
    fn from(sheets: SheetSet) -> Self {
        DataValue::SheetSet(sheets)
    }
}
