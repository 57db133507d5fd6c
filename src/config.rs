// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Optional TOML configuration.
//!
//! ```toml
//! [convert]
//! allow_same_format = true
//! overwrite = false
//! stream = false
//!
//! [inspect]
//! sample_rows = 0      # 0 scans every row
//! preview_rows = 5
//!
//! [report]
//! format = "markdown"
//! ```
//!
//! Every key is optional. Command-line flags take precedence.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::convert::SameFormatPolicy;
use crate::core::{OmniError, Result};
use crate::report::ReportFormat;
use crate::schema::InferenceOptions;

/// Environment variable naming a config file.
pub const CONFIG_ENV: &str = "OMNIDATA_CONFIG";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub convert: ConvertConfig,
    pub inspect: InspectConfig,
    pub report: ReportConfig,
}

/// `[convert]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConvertConfig {
    pub allow_same_format: bool,
    pub overwrite: bool,
    pub stream: bool,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            allow_same_format: true,
            overwrite: false,
            stream: false,
        }
    }
}

/// `[inspect]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InspectConfig {
    pub sample_rows: usize,
    pub preview_rows: usize,
}

impl Default for InspectConfig {
    fn default() -> Self {
        Self {
            sample_rows: 0,
            preview_rows: 5,
        }
    }
}

/// `[report]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    pub format: ReportFormat,
}

impl Config {
    /// Parse a TOML document.
    pub fn from_toml(text: &str, origin: &Path) -> Result<Self> {
        toml::from_str(text).map_err(|e| OmniError::Config {
            path: origin.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Read a config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| OmniError::Config {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let config = Self::from_toml(&text, path)?;
        debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// Load from `explicit`, else from `$OMNIDATA_CONFIG`, else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));
        match path {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn inference_options(&self) -> InferenceOptions {
        InferenceOptions::with_sample_rows(self.inspect.sample_rows)
    }

    pub fn same_format_policy(&self) -> SameFormatPolicy {
        if self.convert.allow_same_format {
            SameFormatPolicy::Allow
        } else {
            SameFormatPolicy::Reject
        }
    }
}
