// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Format codec interface.
//!
//! A codec pairs a decoder (byte stream -> [`DataValue`]) with an encoder
//! ([`DataValue`] -> byte stream) for one serialization format. Codecs are
//! registered by name in a [`FormatRegistry`](super::FormatRegistry) and
//! driven by the conversion runner and the inspection commands.
//!
//! ## Capabilities
//!
//! Each codec advertises [`CodecCapabilities`]. The runner consults them before
//! touching any stream, so an unavailable placeholder codec or a binary format
//! pointed at a terminal stream is rejected up front.
//!
//! ## Streaming
//!
//! Codecs that can work row by row expose a [`RowReader`] and/or a
//! [`RowWriter`]. The runner only streams when both sides of a job support it.

use std::io::{Read, Write};

use crate::core::{DataValue, OmniError, Result};
use crate::io::Endpoint;

/// What a codec can do in this build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecCapabilities {
    /// Backing library is compiled in
    pub available: bool,
    /// Binary format: cannot be read from stdin or written to stdout
    pub binary: bool,
    /// Provides a [`RowReader`]
    pub stream_read: bool,
    /// Provides a [`RowWriter`]
    pub stream_write: bool,
}

impl CodecCapabilities {
    /// Text format, whole-file only.
    pub const fn text() -> Self {
        Self {
            available: true,
            binary: false,
            stream_read: false,
            stream_write: false,
        }
    }

    /// Binary format, whole-file only.
    pub const fn binary() -> Self {
        Self {
            binary: true,
            ..Self::text()
        }
    }

    /// Placeholder whose backing library is missing.
    pub const fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::text()
        }
    }
}

/// Codec for one serialization format.
pub trait FormatCodec: Send + Sync {
    /// Lower-case format name (e.g., "csv", "json").
    fn name(&self) -> &'static str;

    /// Capability flags.
    fn capabilities(&self) -> CodecCapabilities {
        CodecCapabilities::text()
    }

    /// Decode a full dataset.
    ///
    /// # Arguments
    ///
    /// * `input` - Byte stream, already decompressed
    /// * `origin` - Where the bytes come from (codecs may refuse stdin)
    fn decode(&self, input: &mut dyn Read, origin: &Endpoint) -> Result<DataValue>;

    /// Encode a full dataset.
    ///
    /// # Errors
    ///
    /// Returns [`OmniError::TypeMismatch`] when the value's shape cannot be
    /// represented by this format.
    fn encode(&self, value: &DataValue, output: &mut dyn Write, target: &Endpoint) -> Result<()>;

    /// Open a row-at-a-time reader.
    fn row_reader(&self, input: Box<dyn Read>) -> Result<Box<dyn RowReader>> {
        drop(input);
        Err(OmniError::decode(
            self.name(),
            "streaming read is not supported",
        ))
    }

    /// Open a row-at-a-time writer for the given header.
    fn row_writer<'a>(
        &self,
        output: &'a mut dyn Write,
        header: &[String],
    ) -> Result<Box<dyn RowWriter + 'a>> {
        let _ = (output, header);
        Err(OmniError::encode(
            self.name(),
            "streaming write is not supported",
        ))
    }
}

/// Row-at-a-time decoder.
pub trait RowReader {
    /// Column names.
    fn header(&self) -> &[String];

    /// Next data row, or `None` at end of input.
    fn next_row(&mut self) -> Result<Option<Vec<String>>>;
}

/// Row-at-a-time encoder.
pub trait RowWriter {
    /// Write one data row (cells in header order).
    fn write_row(&mut self, row: &[String]) -> Result<()>;

    /// Write any trailer and flush.
    fn finish(self: Box<Self>) -> Result<()>;
}

/// Reject stdin for binary formats.
#[cfg_attr(not(feature = "xlsx"), allow(dead_code))]
pub(crate) fn ensure_seekable_source(format: &str, origin: &Endpoint) -> Result<()> {
    if origin.is_stdio() {
        return Err(OmniError::decode(
            format,
            "reading from standard input is not supported for this binary format",
        ));
    }
    Ok(())
}

/// Reject stdout for binary formats.
#[cfg_attr(not(feature = "xlsx"), allow(dead_code))]
pub(crate) fn ensure_file_sink(format: &str, target: &Endpoint) -> Result<()> {
    if target.is_stdio() {
        return Err(OmniError::encode(
            format,
            "writing to standard output is not supported for this binary format",
        ));
    }
    Ok(())
}
