// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Peek command - schema and first rows of one dataset.

use std::path::PathBuf;

use clap::Args;

use crate::common::{emit, renderer, Result};
use omnidata::inspect;
use omnidata::{Config, Endpoint, FormatRegistry, ReportFormat, SchemaInferencer};

/// Peek at a dataset.
#[derive(Args, Clone, Debug)]
pub struct PeekCmd {
    /// Input file, or "-" for stdin
    #[arg(short, long, value_name = "FILE")]
    input: String,

    /// Input format (detected from the extension when omitted)
    #[arg(long, value_name = "FORMAT")]
    format: Option<String>,

    /// Number of preview rows
    #[arg(short = 'n', long, value_name = "ROWS")]
    rows: Option<usize>,

    /// Include length statistics and sample values
    #[arg(long)]
    stats: bool,

    /// Report format: text, markdown, html, json
    #[arg(long, value_name = "FMT")]
    report: Option<ReportFormat>,

    /// Write the report to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Overwrite an existing report file
    #[arg(long)]
    force: bool,
}

impl PeekCmd {
    pub fn run(self, config: &Config) -> Result<()> {
        let registry = FormatRegistry::with_builtin_formats();
        let inferencer = SchemaInferencer::new().with_options(config.inference_options());
        let rows = self.rows.unwrap_or(config.inspect.preview_rows);

        let report = inspect::peek(
            &registry,
            &inferencer,
            &Endpoint::parse(&self.input),
            self.format.as_deref(),
            rows,
        )?;

        let text = renderer(self.report, config.report.format).render_peek(&report, self.stats)?;
        emit(self.output.as_deref(), &text, self.force)
    }
}
