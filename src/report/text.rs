// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Plain-text terminal report.

use std::fmt::Write as _;

use super::{length_range, nullability, nullable_suffix, summary_line, Renderer};
use crate::core::Result;
use crate::inspect::Preview;
use crate::schema::{ColumnInfo, Schema, SchemaDiff};

const RULE: &str = "========================================";

/// Plain-text renderer.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextRenderer;

fn column_section(out: &mut String, title: &str, marker: char, columns: &[ColumnInfo]) {
    if columns.is_empty() {
        return;
    }
    let _ = writeln!(out, "{title} ({})", columns.len());
    let _ = writeln!(out, "{RULE}");
    for col in columns {
        let _ = writeln!(
            out,
            "  {marker} {}: {}{}",
            col.name,
            col.inferred_type,
            nullable_suffix(col)
        );
    }
    out.push('\n');
}

impl Renderer for TextRenderer {
    fn name(&self) -> &'static str {
        "text"
    }

    fn render(&self, schema: &Schema, source: &str, stats: bool) -> Result<String> {
        let mut out = String::new();
        let _ = writeln!(out, "Schema: {source} ({})", schema.source_format);
        let _ = writeln!(out, "{RULE}");
        let _ = writeln!(out, "Rows:    {}", schema.row_count);
        let _ = writeln!(out, "Columns: {}", schema.column_count);
        out.push('\n');

        let width = schema
            .columns
            .iter()
            .map(|c| c.name.chars().count())
            .max()
            .unwrap_or(0)
            .max("Column".len());

        let _ = writeln!(out, "{:<width$}  {:<8}  Nullable", "Column", "Type");
        for col in &schema.columns {
            let _ = writeln!(
                out,
                "{:<width$}  {:<8}  {}",
                col.name,
                col.inferred_type.as_str(),
                super::yes_no(col.nullable)
            );
            if stats {
                let _ = writeln!(out, "{:<width$}    length: {}", "", length_range(col));
                if !col.sample_values.is_empty() {
                    let _ = writeln!(
                        out,
                        "{:<width$}    samples: {}",
                        "",
                        col.sample_values.join(", ")
                    );
                }
            }
        }
        Ok(out)
    }

    fn render_preview(&self, preview: &Preview) -> Result<String> {
        let mut widths: Vec<usize> = preview.columns.iter().map(|c| c.chars().count()).collect();
        for row in &preview.rows {
            for (w, cell) in widths.iter_mut().zip(row) {
                *w = (*w).max(cell.chars().count());
            }
        }

        let line = |cells: &[String]| -> String {
            cells
                .iter()
                .zip(&widths)
                .map(|(cell, &w)| format!("{cell:<w$}"))
                .collect::<Vec<_>>()
                .join(" | ")
                .trim_end()
                .to_string()
        };

        let mut out = String::new();
        let _ = writeln!(out, "Preview ({} rows)", preview.rows.len());
        let _ = writeln!(out, "{RULE}");
        let _ = writeln!(out, "{}", line(&preview.columns));
        let _ = writeln!(
            out,
            "{}",
            widths
                .iter()
                .map(|w| "-".repeat(*w))
                .collect::<Vec<_>>()
                .join("-+-")
        );
        for row in &preview.rows {
            let _ = writeln!(out, "{}", line(row));
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
        let mut out = String::new();
        let _ = writeln!(out, "Schema Comparison");
        let _ = writeln!(out, "{RULE}");
        for (label, source, schema) in [("File 1", source1, schema1), ("File 2", source2, schema2)] {
            let _ = writeln!(out, "{label}: {source} ({})", schema.source_format);
            let _ = writeln!(out, "  Rows:    {}", schema.row_count);
            let _ = writeln!(out, "  Columns: {}", schema.column_count);
            out.push('\n');
        }

        column_section(&mut out, "Added Columns", '+', &diff.added);
        column_section(&mut out, "Removed Columns", '-', &diff.removed);

        if !diff.changed.is_empty() {
            let _ = writeln!(out, "Changed Columns ({})", diff.changed.len());
            let _ = writeln!(out, "{RULE}");
            for change in &diff.changed {
                let _ = writeln!(out, "  ~ {}", change.name);
                if change.type_changed() {
                    let _ = writeln!(out, "      Type: {} -> {}", change.old_type, change.new_type);
                }
                if change.nullable_changed() {
                    let _ = writeln!(
                        out,
                        "      Nullable: {} -> {}",
                        nullability(change.old_nullable),
                        nullability(change.new_nullable)
                    );
                }
            }
            out.push('\n');
        }

        column_section(&mut out, "Unchanged Columns", '=', &diff.unchanged);
        let _ = writeln!(out, "Summary: {}", summary_line(diff));
        Ok(out)
    }
}
