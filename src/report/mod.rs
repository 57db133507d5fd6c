// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Report rendering for schemas, previews and schema diffs.
//!
//! Every output format implements [`Renderer`]. Pick one by name with
//! [`ReportFormat`]:
//!
//! ```
//! use omnidata::report::ReportFormat;
//!
//! let format: ReportFormat = "md".parse().unwrap();
//! assert_eq!(format, ReportFormat::Markdown);
//! assert_eq!(format.renderer().name(), "markdown");
//! ```

pub mod html;
pub mod json;
pub mod markdown;
pub mod text;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::{OmniError, Result};
use crate::inspect::{DiffReport, PeekReport, Preview};
use crate::schema::{ColumnInfo, Schema, SchemaDiff};

pub use html::HtmlRenderer;
pub use json::JsonRenderer;
pub use markdown::MarkdownRenderer;
pub use text::TextRenderer;

/// Renders inspection results as text.
pub trait Renderer {
    /// Renderer name (e.g., "markdown").
    fn name(&self) -> &'static str;

    /// Render a schema. `stats` adds length statistics and sample values.
    fn render(&self, schema: &Schema, source: &str, stats: bool) -> Result<String>;

    /// Render a data preview.
    fn render_preview(&self, preview: &Preview) -> Result<String>;

    /// Render a schema diff between `schema1` (old) and `schema2` (new).
    fn render_diff(
        &self,
        diff: &SchemaDiff,
        schema1: &Schema,
        schema2: &Schema,
        source1: &str,
        source2: &str,
    ) -> Result<String>;

    /// Render a peek result: schema then preview.
    fn render_peek(&self, report: &PeekReport, stats: bool) -> Result<String> {
        let mut out = self.render(&report.schema, &report.source, stats)?;
        if !report.preview.columns.is_empty() {
            out.push('\n');
            out.push_str(&self.render_preview(&report.preview)?);
        }
        Ok(out)
    }

    /// Render a diff result.
    fn render_diff_report(&self, report: &DiffReport) -> Result<String> {
        self.render_diff(
            &report.diff,
            &report.schema1,
            &report.schema2,
            &report.source1,
            &report.source2,
        )
    }
}

/// Report output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    #[serde(alias = "md")]
    Markdown,
    Html,
    Json,
}

impl ReportFormat {
    pub const ALL: [ReportFormat; 4] = [
        ReportFormat::Text,
        ReportFormat::Markdown,
        ReportFormat::Html,
        ReportFormat::Json,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportFormat::Text => "text",
            ReportFormat::Markdown => "markdown",
            ReportFormat::Html => "html",
            ReportFormat::Json => "json",
        }
    }

    /// Renderer for this format.
    pub fn renderer(&self) -> Box<dyn Renderer> {
        match self {
            ReportFormat::Text => Box::new(TextRenderer),
            ReportFormat::Markdown => Box::new(MarkdownRenderer),
            ReportFormat::Html => Box::new(HtmlRenderer),
            ReportFormat::Json => Box::new(JsonRenderer),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportFormat {
    type Err = OmniError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(ReportFormat::Text),
            "markdown" | "md" => Ok(ReportFormat::Markdown),
            "html" => Ok(ReportFormat::Html),
            "json" => Ok(ReportFormat::Json),
            _ => Err(OmniError::unsupported_format(
                s,
                "unknown report format (supported: text, markdown, html, json)",
            )),
        }
    }
}

/// " (nullable)" or "".
pub(crate) fn nullable_suffix(column: &ColumnInfo) -> &'static str {
    if column.nullable {
        " (nullable)"
    } else {
        ""
    }
}

pub(crate) fn nullability(nullable: bool) -> &'static str {
    if nullable {
        "nullable"
    } else {
        "not nullable"
    }
}

pub(crate) fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

/// "min-max" length range, or "-" when nothing was measured.
pub(crate) fn length_range(column: &ColumnInfo) -> String {
    match (column.min_length, column.max_length) {
        (Some(min), Some(max)) => format!("{min}-{max}"),
        _ => "-".to_string(),
    }
}

pub(crate) fn summary_line(diff: &SchemaDiff) -> String {
    match diff.change_count() {
        0 => "Schemas are identical".to_string(),
        n => format!("{n} change(s) detected"),
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_report_format() {
        assert_eq!("TEXT".parse::<ReportFormat>().unwrap(), ReportFormat::Text);
        assert_eq!("md".parse::<ReportFormat>().unwrap(), ReportFormat::Markdown);
        assert_eq!("html".parse::<ReportFormat>().unwrap(), ReportFormat::Html);
        assert!("pdf".parse::<ReportFormat>().is_err());
    }

    #[test]
    fn test_every_format_has_renderer() {
        for format in ReportFormat::ALL {
            assert_eq!(format.renderer().name(), format.as_str());
        }
    }

    #[test]
    fn test_summary_line() {
        let (old, _, diff) = fixtures::pair();
        assert_eq!(summary_line(&diff), "3 change(s) detected");
        assert_eq!(
            summary_line(&crate::schema::compare(&old, &old)),
            "Schemas are identical"
        );
    }
}
