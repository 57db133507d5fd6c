// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Conversion pipeline.
//!
//! - [`ConversionJob`] - what to convert
//! - [`ConversionRunner`] - validate, resolve, decode and encode one job
//! - [`ConversionReport`] - outcome of a successful job
//!
//! # Example
//!
//! ```no_run
//! use omnidata::convert::{ConversionJob, ConversionRunner};
//! use omnidata::formats::FormatRegistry;
//!
//! let registry = FormatRegistry::with_builtin_formats();
//! let report = ConversionRunner::new(&registry)
//!     .run(&ConversionJob::new("people.csv", "people.json"))?;
//! println!("{report}");
//! # Ok::<(), omnidata::OmniError>(())
//! ```

pub mod job;
pub mod runner;
pub mod state;

pub use job::{ConversionJob, ConversionReport};
pub use runner::{ConversionRunner, SameFormatPolicy};
pub use state::{JobStage, JobState};
