// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Conversion job description and outcome.

use std::fmt;

use crate::io::Endpoint;

use super::state::JobState;

/// One conversion: source endpoint and format to sink endpoint and format.
///
/// A missing format is detected from the endpoint's file extension.
///
/// # Example
///
/// ```
/// use omnidata::convert::ConversionJob;
///
/// let job = ConversionJob::new("people.csv", "people.json.gz")
///     .with_target_format("json")
///     .with_dry_run(true);
/// assert!(job.dry_run);
/// assert!(job.sink.is_gzip());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionJob {
    pub source: Endpoint,
    pub sink: Endpoint,
    pub source_format: Option<String>,
    pub target_format: Option<String>,
    /// Validate and decode, never write
    pub dry_run: bool,
    /// Replace an existing sink file
    pub overwrite: bool,
    /// Convert row by row when both codecs allow it
    pub stream: bool,
}

impl ConversionJob {
    /// Create a job between two paths (`-` for standard streams).
    pub fn new(source: impl AsRef<str>, sink: impl AsRef<str>) -> Self {
        Self {
            source: Endpoint::parse(source),
            sink: Endpoint::parse(sink),
            source_format: None,
            target_format: None,
            dry_run: false,
            overwrite: false,
            stream: false,
        }
    }

    pub fn with_source_format(mut self, format: impl Into<String>) -> Self {
        self.source_format = Some(format.into());
        self
    }

    pub fn with_target_format(mut self, format: impl Into<String>) -> Self {
        self.target_format = Some(format.into());
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn with_stream(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }
}

/// Outcome of a successful job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionReport {
    pub source: Endpoint,
    pub sink: Endpoint,
    pub source_format: String,
    pub target_format: String,
    pub dry_run: bool,
    /// Data rows copied when the job ran in streaming mode
    pub streamed_rows: Option<usize>,
    pub state: JobState,
}

impl fmt::Display for ConversionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.dry_run {
            write!(f, "[dry-run] Would convert ")?;
        } else {
            write!(f, "Successfully converted ")?;
        }
        write!(
            f,
            "{} ({}) -> {} ({})",
            self.source, self.source_format, self.sink, self.target_format
        )?;
        if let Some(rows) = self.streamed_rows {
            write!(f, " [streamed {rows} rows]")?;
        }
        Ok(())
    }
}
