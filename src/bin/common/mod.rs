// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Common utilities for CLI commands.

use std::fs::OpenOptions;
use std::io::Write as _;
use std::path::Path;

use anyhow::Context as _;
use tracing_subscriber::EnvFilter;

use omnidata::{Renderer, ReportFormat};

pub use anyhow::Result as CliResult;
pub type Result<T = ()> = CliResult<T>;

/// Default log level for a `-v` count.
pub fn log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Log to stderr. `RUST_LOG` wins over `-v`.
pub fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("omnidata={}", log_level(verbose))));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Report renderer: the flag if given, else the configured default.
pub fn renderer(flag: Option<ReportFormat>, configured: ReportFormat) -> Box<dyn Renderer> {
    flag.unwrap_or(configured).renderer()
}

/// Write a rendered report to `output`, or stdout when absent.
///
/// An existing report file is kept unless `overwrite` is set.
pub fn emit(output: Option<&Path>, text: &str, overwrite: bool) -> Result<()> {
    match output {
        Some(path) => {
            if !overwrite && path.exists() {
                anyhow::bail!(
                    "report file {} already exists (use --force to overwrite)",
                    path.display()
                );
            }
            let mut options = OpenOptions::new();
            options.write(true);
            if overwrite {
                options.create(true).truncate(true);
            } else {
                options.create_new(true);
            }
            let mut file = options
                .open(path)
                .with_context(|| format!("failed to write report to {}", path.display()))?;
            file.write_all(text.as_bytes())
                .with_context(|| format!("failed to write report to {}", path.display()))?;
            Ok(())
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level() {
        assert_eq!(log_level(0), "warn");
        assert_eq!(log_level(1), "info");
        assert_eq!(log_level(2), "debug");
        assert_eq!(log_level(9), "trace");
    }

    #[test]
    fn test_renderer_flag_wins() {
        assert_eq!(renderer(None, ReportFormat::Html).name(), "html");
        assert_eq!(
            renderer(Some(ReportFormat::Json), ReportFormat::Html).name(),
            "json"
        );
    }

    #[test]
    fn test_emit_keeps_existing_report() {
        let dir = std::env::temp_dir().join(format!("omnidata_emit_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("report.md");
        std::fs::write(&path, "old").unwrap();

        let err = emit(Some(&path), "new", false).unwrap_err();
        assert!(err.to_string().contains("already exists"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "old");

        emit(Some(&path), "new", true).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");

        let _ = std::fs::remove_dir_all(&dir);
    }
}
