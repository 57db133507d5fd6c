// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Schema inference and comparison for decoded datasets.
//!
//! - [`SchemaInferencer`] derives a [`Schema`] from a [`DataValue`](crate::DataValue)
//! - [`compare`] classifies two schemas' columns into a [`SchemaDiff`]

pub mod diff;
pub mod infer;

pub use diff::{compare, ColumnChange, SchemaDiff};
pub use infer::{
    ColumnInfo, ColumnType, InferenceOptions, InferenceStrategy, Schema, SchemaInferencer,
    SheetSetStrategy, TableStrategy, TreeStrategy, TypeState, MAX_SAMPLES, MIN_SAMPLE_ROWS,
};
