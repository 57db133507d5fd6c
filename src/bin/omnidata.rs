// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # Omnidata CLI
//!
//! Command-line tool for converting and inspecting structured data files.
//!
//! ## Usage
//!
//! ```sh
//! # Convert formats (detected from extensions)
//! omnidata convert -i people.csv -o people.json
//!
//! # Read stdin, write gzip-compressed YAML
//! cat people.csv | omnidata convert -i - --from csv -o people.yaml.gz
//!
//! # Show schema and first rows
//! omnidata peek -i people.json --stats
//!
//! # Compare two schemas
//! omnidata diff old.csv new.json --report markdown
//!
//! # List formats
//! omnidata formats
//! ```

mod cmd;
mod common;

use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser, Subcommand};
use cmd::{ConvertCmd, DiffCmd, FormatsCmd, PeekCmd};
use common::{init_logging, Result};
use omnidata::Config;

/// Omnidata - structured data translator
///
/// Convert between CSV, JSON, YAML, XML and XLSX, infer schemas and compare
/// them. Formats are detected from file extensions; `-` means stdin/stdout.
#[derive(Parser, Clone)]
#[command(name = "omnidata")]
#[command(about = "Structured data translator for CSV, JSON, YAML, XML and XLSX", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "ArcheBase")]
struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true, value_name = "PATH", env = "OMNIDATA_CONFIG")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Clone)]
enum Commands {
    /// Convert a dataset from one format to another
    Convert(ConvertCmd),

    /// Show the inferred schema and first rows of a dataset
    Peek(PeekCmd),

    /// Compare the schemas of two datasets
    Diff(DiffCmd),

    /// List registered formats
    Formats(FormatsCmd),
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Convert(cmd) => cmd.run(&config),
        Commands::Peek(cmd) => cmd.run(&config),
        Commands::Diff(cmd) => cmd.run(&config),
        Commands::Formats(cmd) => cmd.run(),
    }
}

fn main() {
    let result = run();

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
