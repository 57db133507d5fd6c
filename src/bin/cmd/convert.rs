// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Convert command - translate a dataset between formats.

use clap::Args;

use crate::common::Result;
use omnidata::{Config, ConversionJob, ConversionRunner, FormatRegistry};

/// Convert a dataset.
#[derive(Args, Clone, Debug)]
pub struct ConvertCmd {
    /// Input file, or "-" for stdin
    #[arg(short, long, value_name = "FILE")]
    input: String,

    /// Output file, or "-" for stdout
    #[arg(short, long, value_name = "FILE")]
    output: String,

    /// Input format (detected from the extension when omitted)
    #[arg(long, value_name = "FORMAT")]
    from: Option<String>,

    /// Output format (detected from the extension when omitted)
    #[arg(long, value_name = "FORMAT")]
    to: Option<String>,

    /// Validate and report without writing the output
    #[arg(long)]
    dry_run: bool,

    /// Overwrite an existing output file
    #[arg(long, overrides_with = "no_force")]
    force: bool,

    /// Never overwrite, even if the config file allows it
    #[arg(long, overrides_with = "force")]
    no_force: bool,

    /// Convert row by row when both formats support it
    #[arg(long, overrides_with = "no_stream")]
    stream: bool,

    /// Convert the whole file at once, even if the config file enables streaming
    #[arg(long, overrides_with = "stream")]
    no_stream: bool,
}

/// Value of a `--flag`/`--no-flag` pair, falling back to `configured`.
fn switch(on: bool, off: bool, configured: bool) -> bool {
    match (on, off) {
        (true, _) => true,
        (_, true) => false,
        _ => configured,
    }
}

impl ConvertCmd {
    /// Build the job; flags win over config.
    fn job(&self, config: &Config) -> ConversionJob {
        let mut job = ConversionJob::new(&self.input, &self.output)
            .with_dry_run(self.dry_run)
            .with_overwrite(switch(self.force, self.no_force, config.convert.overwrite))
            .with_stream(switch(self.stream, self.no_stream, config.convert.stream));
        if let Some(from) = &self.from {
            job = job.with_source_format(from);
        }
        if let Some(to) = &self.to {
            job = job.with_target_format(to);
        }
        job
    }

    pub fn run(self, config: &Config) -> Result<()> {
        let registry = FormatRegistry::with_builtin_formats();
        let runner =
            ConversionRunner::new(&registry).with_same_format_policy(config.same_format_policy());

        let report = runner.run(&self.job(config))?;

        // stdout may carry the converted data
        if report.sink.is_stdio() && !report.dry_run {
            eprintln!("{report}");
        } else {
            println!("{report}");
        }
        Ok(())
    }
}
