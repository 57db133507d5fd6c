// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! First rows of a dataset, flattened to text cells.

use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::core::{cell_text, DataValue, Table};

/// Tabular preview: column names and up to N rows of cells.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Preview {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Preview {
    /// Take the first `limit` rows of a value.
    ///
    /// Sheet sets preview their first sheet with `<sheet>.`-prefixed columns.
    /// Trees that are neither an object nor an array preview as one `value`
    /// cell.
    pub fn from_value(value: &DataValue, limit: usize) -> Self {
        match value {
            DataValue::Table(table) => Self::from_table(table, None, limit),
            DataValue::SheetSet(sheets) => sheets
                .iter()
                .next()
                .map(|(name, table)| Self::from_table(table, Some(name.as_str()), limit))
                .unwrap_or_default(),
            DataValue::Tree(tree) => Self::from_tree(tree, limit),
        }
    }

    fn from_table(table: &Table, prefix: Option<&str>, limit: usize) -> Self {
        let Some(header) = table.header() else {
            return Self::default();
        };
        let columns = header
            .iter()
            .map(|h| match prefix {
                Some(p) => format!("{p}.{h}"),
                None => h.clone(),
            })
            .collect();
        let rows = table
            .data_rows()
            .iter()
            .take(limit)
            .map(|row| {
                (0..header.len())
                    .map(|i| row.get(i).cloned().unwrap_or_default())
                    .collect()
            })
            .collect();
        Self { columns, rows }
    }

    fn from_tree(tree: &JsonValue, limit: usize) -> Self {
        match tree {
            JsonValue::Array(items) if items.first().is_some_and(JsonValue::is_object) => {
                let shown: Vec<_> = items.iter().take(limit).collect();
                let mut columns: Vec<String> = Vec::new();
                for obj in shown.iter().filter_map(|item| item.as_object()) {
                    for key in obj.keys() {
                        if !columns.contains(key) {
                            columns.push(key.clone());
                        }
                    }
                }
                let rows = shown
                    .iter()
                    .map(|item| {
                        columns
                            .iter()
                            .map(|key| item.get(key).map(cell_text).unwrap_or_default())
                            .collect()
                    })
                    .collect();
                Self { columns, rows }
            }
            JsonValue::Array(items) => Self {
                columns: vec!["value".to_string()],
                rows: items
                    .iter()
                    .take(limit)
                    .map(|item| vec![cell_text(item)])
                    .collect(),
            },
            JsonValue::Object(obj) => Self {
                columns: obj.keys().cloned().collect(),
                rows: if limit == 0 {
                    Vec::new()
                } else {
                    vec![obj.values().map(cell_text).collect()]
                },
            },
            scalar => Self {
                columns: vec!["value".to_string()],
                rows: if limit == 0 {
                    Vec::new()
                } else {
                    vec![vec![cell_text(scalar)]]
                },
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
