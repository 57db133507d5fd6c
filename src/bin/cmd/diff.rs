// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Diff command - compare the schemas of two datasets.

use std::path::PathBuf;

use clap::Args;

use crate::common::{emit, renderer, Result};
use omnidata::inspect;
use omnidata::{Config, Endpoint, FormatRegistry, ReportFormat, SchemaInferencer};

/// Compare two schemas.
#[derive(Args, Clone, Debug)]
pub struct DiffCmd {
    /// Old dataset ("-" for stdin)
    #[arg(value_name = "FILE1")]
    file1: String,

    /// New dataset ("-" for stdin, if FILE1 is not)
    #[arg(value_name = "FILE2")]
    file2: String,

    /// Format of FILE1
    #[arg(long, value_name = "FORMAT")]
    format1: Option<String>,

    /// Format of FILE2
    #[arg(long, value_name = "FORMAT")]
    format2: Option<String>,

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

impl DiffCmd {
    pub fn run(self, config: &Config) -> Result<()> {
        let registry = FormatRegistry::with_builtin_formats();
        let inferencer = SchemaInferencer::new().with_options(config.inference_options());

        let source1 = Endpoint::parse(&self.file1);
        let source2 = Endpoint::parse(&self.file2);
        let report = inspect::diff(
            &registry,
            &inferencer,
            (&source1, self.format1.as_deref()),
            (&source2, self.format2.as_deref()),
        )?;

        let text = renderer(self.report, config.report.format).render_diff_report(&report)?;
        emit(self.output.as_deref(), &text, self.force)
    }
}
