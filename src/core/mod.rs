// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core types used throughout omnidata.
//!
//! This module provides the foundational types for the library:
//! - [`OmniError`] - Error taxonomy shared by codecs, runner and inspection
//! - [`DataValue`] - Generic dataset value (Table, Tree, SheetSet)

pub mod error;
pub mod value;

pub use error::{OmniError, Result};
pub use value::{cell_text, DataValue, RecordKeys, SheetSet, Table, Tree, ValueShape};
