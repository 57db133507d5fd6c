// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Schema comparison.
//!
//! Columns are matched by exact, case-sensitive name. Within each bucket the
//! order is stable: `removed`, `changed` and `unchanged` follow the old
//! schema's column order, `added` follows the new schema's.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::infer::{ColumnInfo, ColumnType, Schema};

/// Column present in both schemas with a different type or nullability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnChange {
    pub name: String,
    pub old_type: ColumnType,
    pub new_type: ColumnType,
    pub old_nullable: bool,
    pub new_nullable: bool,
}

impl ColumnChange {
    pub fn type_changed(&self) -> bool {
        self.old_type != self.new_type
    }

    pub fn nullable_changed(&self) -> bool {
        self.old_nullable != self.new_nullable
    }
}

/// Classification of two schemas' columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDiff {
    /// Only in the new schema
    pub added: Vec<ColumnInfo>,
    /// Only in the old schema
    pub removed: Vec<ColumnInfo>,
    pub changed: Vec<ColumnChange>,
    pub unchanged: Vec<ColumnInfo>,
}

impl SchemaDiff {
    /// Number of added, removed and changed columns.
    pub fn change_count(&self) -> usize {
        self.added.len() + self.removed.len() + self.changed.len()
    }

    /// Whether the schemas have the same columns, types and nullability.
    pub fn is_identical(&self) -> bool {
        self.change_count() == 0
    }
}

/// Compare `old` against `new`.
///
/// # Example
///
/// ```
/// use omnidata::schema::{compare, Schema};
///
/// let s = Schema::empty("csv");
/// assert!(compare(&s, &s).is_identical());
/// ```
pub fn compare(old: &Schema, new: &Schema) -> SchemaDiff {
    let old_by_name: HashMap<&str, &ColumnInfo> =
        old.columns.iter().map(|c| (c.name.as_str(), c)).collect();
    let new_by_name: HashMap<&str, &ColumnInfo> =
        new.columns.iter().map(|c| (c.name.as_str(), c)).collect();

    let mut diff = SchemaDiff::default();

    for col in &old.columns {
        match new_by_name.get(col.name.as_str()) {
            None => diff.removed.push(col.clone()),
            Some(other)
                if other.inferred_type != col.inferred_type || other.nullable != col.nullable =>
            {
                diff.changed.push(ColumnChange {
                    name: col.name.clone(),
                    old_type: col.inferred_type,
                    new_type: other.inferred_type,
                    old_nullable: col.nullable,
                    new_nullable: other.nullable,
                });
            }
            Some(_) => diff.unchanged.push(col.clone()),
        }
    }

    diff.added = new
        .columns
        .iter()
        .filter(|c| !old_by_name.contains_key(c.name.as_str()))
        .cloned()
        .collect();

    diff
}
