// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Standalone HTML report. All dataset text is escaped.

use std::fmt::Write as _;

use super::{length_range, nullability, summary_line, yes_no, Renderer};
use crate::core::Result;
use crate::inspect::Preview;
use crate::schema::{ColumnInfo, Schema, SchemaDiff};

const STYLE: &str = "body { font-family: Arial, sans-serif; margin: 20px; }\n\
table { border-collapse: collapse; width: 100%; }\n\
th, td { border: 1px solid #ddd; padding: 8px; text-align: left; }\n\
th { background-color: #4CAF50; color: white; }\n\
tr:nth-child(even) { background-color: #f2f2f2; }";

/// HTML renderer.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlRenderer;

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

fn open_document(out: &mut String, title: &str) {
    let _ = writeln!(out, "<!DOCTYPE html>\n<html>\n<head>");
    let _ = writeln!(out, "<meta charset=\"utf-8\">");
    let _ = writeln!(out, "<title>{}</title>", escape(title));
    let _ = writeln!(out, "<style>\n{STYLE}\n</style>\n</head>\n<body>");
}

fn close_document(out: &mut String) {
    out.push_str("</body>\n</html>\n");
}

fn table(out: &mut String, header: &[&str], rows: impl IntoIterator<Item = Vec<String>>) {
    out.push_str("<table>\n<tr>");
    for h in header {
        let _ = write!(out, "<th>{}</th>", escape(h));
    }
    out.push_str("</tr>\n");
    for row in rows {
        out.push_str("<tr>");
        for cell in row {
            let _ = write!(out, "<td>{}</td>", escape(&cell));
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</table>\n");
}

fn column_list(out: &mut String, title: &str, columns: &[ColumnInfo]) {
    if columns.is_empty() {
        return;
    }
    let _ = writeln!(out, "<h3>{title} ({})</h3>\n<ul>", columns.len());
    for col in columns {
        let _ = writeln!(
            out,
            "<li>{}: {}{}</li>",
            escape(&col.name),
            col.inferred_type,
            if col.nullable { " (nullable)" } else { "" }
        );
    }
    out.push_str("</ul>\n");
}

impl HtmlRenderer {
    fn schema_body(out: &mut String, schema: &Schema, source: &str, stats: bool) {
        let _ = writeln!(
            out,
            "<h1>Schema: {} ({})</h1>",
            escape(source),
            escape(&schema.source_format)
        );
        let _ = writeln!(out, "<p><strong>Rows:</strong> {}</p>", schema.row_count);
        let _ = writeln!(out, "<p><strong>Columns:</strong> {}</p>", schema.column_count);
        out.push_str("<h2>Columns</h2>\n");

        let mut header = vec!["Name", "Type", "Nullable"];
        if stats {
            header.extend(["Length", "Samples"]);
        }
        let rows = schema.columns.iter().map(|col| {
            let mut cells = vec![
                col.name.clone(),
                col.inferred_type.to_string(),
                yes_no(col.nullable).to_string(),
            ];
            if stats {
                cells.push(length_range(col));
                cells.push(col.sample_values.join(", "));
            }
            cells
        });
        table(out, &header, rows);
    }

    fn preview_body(out: &mut String, preview: &Preview) {
        let _ = writeln!(out, "<h2>Preview ({} rows)</h2>", preview.rows.len());
        let header: Vec<&str> = preview.columns.iter().map(String::as_str).collect();
        table(out, &header, preview.rows.iter().cloned());
    }
}

impl Renderer for HtmlRenderer {
    fn name(&self) -> &'static str {
        "html"
    }

    fn render(&self, schema: &Schema, source: &str, stats: bool) -> Result<String> {
        let mut out = String::new();
        open_document(&mut out, &format!("Schema: {source}"));
        Self::schema_body(&mut out, schema, source, stats);
        close_document(&mut out);
        Ok(out)
    }

    fn render_preview(&self, preview: &Preview) -> Result<String> {
        let mut out = String::new();
        open_document(&mut out, "Preview");
        Self::preview_body(&mut out, preview);
        close_document(&mut out);
        Ok(out)
    }

    // One document holding both sections
    fn render_peek(&self, report: &crate::inspect::PeekReport, stats: bool) -> Result<String> {
        let mut out = String::new();
        open_document(&mut out, &format!("Schema: {}", report.source));
        Self::schema_body(&mut out, &report.schema, &report.source, stats);
        if !report.preview.columns.is_empty() {
            Self::preview_body(&mut out, &report.preview);
        }
        close_document(&mut out);
        Ok(out)
    }

    fn render_diff(
        &self,
        diff: &SchemaDiff,
        schema1: &Schema,
        schema2: &Schema,
        source1: &str,
        source2: &str,
    ) -> Result<String> {
        let mut out = String::new();
        open_document(&mut out, "Schema Comparison");
        out.push_str("<h1>Schema Comparison</h1>\n");
        for (label, source, schema) in [("File 1", source1, schema1), ("File 2", source2, schema2)] {
            let _ = writeln!(
                out,
                "<h2>{label}: {} ({})</h2>\n<p>Rows: {}, Columns: {}</p>",
                escape(source),
                escape(&schema.source_format),
                schema.row_count,
                schema.column_count
            );
        }

        column_list(&mut out, "Added Columns", &diff.added);
        column_list(&mut out, "Removed Columns", &diff.removed);

        if !diff.changed.is_empty() {
            let _ = writeln!(out, "<h3>Changed Columns ({})</h3>\n<ul>", diff.changed.len());
            for change in &diff.changed {
                let mut details = Vec::new();
                if change.type_changed() {
                    details.push(format!("{} &rarr; {}", change.old_type, change.new_type));
                }
                if change.nullable_changed() {
                    details.push(format!(
                        "{} &rarr; {}",
                        nullability(change.old_nullable),
                        nullability(change.new_nullable)
                    ));
                }
                let _ = writeln!(
                    out,
                    "<li>{}: {}</li>",
                    escape(&change.name),
                    details.join("; ")
                );
            }
            out.push_str("</ul>\n");
        }

        column_list(&mut out, "Unchanged Columns", &diff.unchanged);
        let _ = writeln!(out, "<p><strong>Summary:</strong> {}</p>", summary_line(diff));
        close_document(&mut out);
        Ok(out)
    }
}
