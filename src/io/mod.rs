// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! I/O layer: endpoints, transparent compression and format detection.

pub mod detection;
pub mod endpoint;

pub use detection::detect_format;
pub use endpoint::{Endpoint, SinkStream, SourceStream, STDIO_SENTINEL};
