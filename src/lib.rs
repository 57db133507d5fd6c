// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # Omnidata
//!
//! Structured-data translator: convert datasets between CSV, JSON, YAML, XML
//! and XLSX, infer their schemas and compare the schemas of two datasets.
//!
//! The library is organized by concern:
//! - `core/` - Error taxonomy and the generic [`DataValue`] (Table, Tree, SheetSet)
//! - `io/` - Endpoints (files, gzip, standard streams) and format detection
//! - `formats/` - Codecs and the [`FormatRegistry`]
//! - `convert/` - Conversion jobs and the [`ConversionRunner`]
//! - `schema/` - Schema inference and schema diff
//! - `inspect/` - Peek and diff operations over whole datasets
//! - `report/` - Text, Markdown, HTML and JSON renderers
//! - `config` - Optional TOML configuration
//!
//! ## Example: Converting CSV to JSON
//!
//! ```rust,no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use omnidata::{ConversionJob, ConversionRunner, FormatRegistry};
//!
//! let registry = FormatRegistry::with_builtin_formats();
//! let runner = ConversionRunner::new(&registry);
//! let report = runner.run(&ConversionJob::new("people.csv", "people.json.gz"))?;
//! println!("{report}");
//! # Ok(())
//! # }
//! ```
//!
//! ## Example: Inferring a schema
//!
//! ```rust
//! use omnidata::{DataValue, SchemaInferencer};
//! use serde_json::json;
//!
//! let value = DataValue::Tree(json!([{"id": 1, "name": "Ann"}, {"id": 2, "name": null}]));
//! let schema = SchemaInferencer::new().infer(&value, "json").unwrap();
//! assert_eq!(schema.row_count, 2);
//! assert!(schema.column("name").unwrap().nullable);
//! ```

// Core types
pub mod core;

// Re-export core types for convenience
pub use core::{DataValue, OmniError, Result, SheetSet, Table, Tree, ValueShape};

// Endpoints and detection
pub mod io;

pub use io::Endpoint;

// Codecs
pub mod formats;

pub use formats::{FormatCodec, FormatRegistry};

// Conversion pipeline
pub mod convert;

pub use convert::{ConversionJob, ConversionReport, ConversionRunner, JobStage, JobState};

// Schema inference and diff
pub mod schema;

pub use schema::{compare, ColumnInfo, ColumnType, Schema, SchemaDiff, SchemaInferencer};

// Peek and diff over datasets
pub mod inspect;

// Report renderers
pub mod report;

pub use report::{ReportFormat, Renderer};

// Configuration
pub mod config;

pub use config::Config;
