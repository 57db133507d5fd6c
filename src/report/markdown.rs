// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Markdown report.

use std::fmt::Write as _;

use super::{length_range, nullability, nullable_suffix, summary_line, yes_no, Renderer};
use crate::core::Result;
use crate::inspect::Preview;
use crate::schema::{ColumnInfo, Schema, SchemaDiff};

/// Markdown renderer.
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkdownRenderer;

/// Escape a table cell.
fn cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

fn table_row(out: &mut String, cells: &[String]) {
    let _ = writeln!(out, "| {} |", cells.join(" | "));
}

fn column_list(out: &mut String, title: &str, columns: &[ColumnInfo]) {
    if columns.is_empty() {
        return;
    }
    let _ = writeln!(out, "## {title} ({})\n", columns.len());
    for col in columns {
        let _ = writeln!(
            out,
            "- **{}**: {}{}",
            cell(&col.name),
            col.inferred_type,
            nullable_suffix(col)
        );
    }
    out.push('\n');
}

impl Renderer for MarkdownRenderer {
    fn name(&self) -> &'static str {
        "markdown"
    }

    fn render(&self, schema: &Schema, source: &str, stats: bool) -> Result<String> {
        let mut out = String::new();
        let _ = writeln!(out, "# Schema: {} ({})\n", cell(source), schema.source_format);
        let _ = writeln!(out, "- **Rows:** {}", schema.row_count);
        let _ = writeln!(out, "- **Columns:** {}\n", schema.column_count);
        out.push_str("## Columns\n\n");

        if stats {
            out.push_str("| Name | Type | Nullable | Length | Samples |\n");
            out.push_str("|------|------|----------|--------|---------|\n");
        } else {
            out.push_str("| Name | Type | Nullable |\n");
            out.push_str("|------|------|----------|\n");
        }

        for col in &schema.columns {
            let mut cells = vec![
                cell(&col.name),
                col.inferred_type.to_string(),
                yes_no(col.nullable).to_string(),
            ];
            if stats {
                cells.push(length_range(col));
                cells.push(cell(&col.sample_values.join(", ")));
            }
            table_row(&mut out, &cells);
        }
        Ok(out)
    }

    fn render_preview(&self, preview: &Preview) -> Result<String> {
        let mut out = String::new();
        let _ = writeln!(out, "## Preview ({} rows)\n", preview.rows.len());
        let header: Vec<String> = preview.columns.iter().map(|c| cell(c)).collect();
        table_row(&mut out, &header);
        let rule: Vec<String> = preview.columns.iter().map(|_| "---".to_string()).collect();
        table_row(&mut out, &rule);
        for row in &preview.rows {
            let cells: Vec<String> = row.iter().map(|c| cell(c)).collect();
            table_row(&mut out, &cells);
        }
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
        let mut out = String::from("# Schema Comparison\n\n");
        for (label, source, schema) in [("File 1", source1, schema1), ("File 2", source2, schema2)] {
            let _ = writeln!(out, "## {label}: {} ({})", cell(source), schema.source_format);
            let _ = writeln!(out, "- Rows: {}", schema.row_count);
            let _ = writeln!(out, "- Columns: {}\n", schema.column_count);
        }

        column_list(&mut out, "Added Columns", &diff.added);
        column_list(&mut out, "Removed Columns", &diff.removed);

        if !diff.changed.is_empty() {
            let _ = writeln!(out, "## Changed Columns ({})\n", diff.changed.len());
            for change in &diff.changed {
                let _ = writeln!(out, "### {}", cell(&change.name));
                if change.type_changed() {
                    let _ = writeln!(out, "- Type: `{}` -> `{}`", change.old_type, change.new_type);
                }
                if change.nullable_changed() {
                    let _ = writeln!(
                        out,
                        "- Nullable: {} -> {}",
                        nullability(change.old_nullable),
                        nullability(change.new_nullable)
                    );
                }
                out.push('\n');
            }
        }

        column_list(&mut out, "Unchanged Columns", &diff.unchanged);
        let _ = writeln!(out, "**Summary:** {}", summary_line(diff));
        Ok(out)
    }
}
