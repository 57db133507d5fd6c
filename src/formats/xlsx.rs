// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! XLSX spreadsheet codec.
//!
//! Decodes every worksheet into a [`SheetSet`]. Encodes a SheetSet one
//! worksheet per entry; a Table or a Tree of records lands in `Sheet1`.
//!
//! XLSX is a zip container, so the whole payload is buffered. Reading from
//! standard input and writing to standard output are refused.

use std::io::{Cursor, Read, Write};

use calamine::{Data, Reader, Xlsx};
use rust_xlsxwriter::Workbook;
use tracing::debug;

use super::codec::{ensure_file_sink, ensure_seekable_source, CodecCapabilities, FormatCodec};
use crate::core::{DataValue, OmniError, Result, SheetSet, Table};
use crate::io::Endpoint;

const NAME: &str = "xlsx";
const DEFAULT_SHEET: &str = "Sheet1";

/// XLSX codec backed by `calamine` (read) and `rust_xlsxwriter` (write).
#[derive(Debug, Default, Clone, Copy)]
pub struct XlsxCodec;

impl XlsxCodec {
    pub fn new() -> Self {
        Self
    }
}

fn cell_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

fn write_sheet(workbook: &mut Workbook, name: &str, table: &Table) -> Result<()> {
    let encode_err = |e: rust_xlsxwriter::XlsxError| OmniError::encode(NAME, e.to_string());

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(name).map_err(encode_err)?;

    for (r, row) in table.rows().iter().enumerate() {
        let r = u32::try_from(r)
            .map_err(|_| OmniError::encode(NAME, "too many rows for a worksheet"))?;
        for (c, cell) in row.iter().enumerate() {
            let c = u16::try_from(c)
                .map_err(|_| OmniError::encode(NAME, "too many columns for a worksheet"))?;
            if !cell.is_empty() {
                worksheet.write_string(r, c, cell).map_err(encode_err)?;
            }
        }
    }
    Ok(())
}

impl FormatCodec for XlsxCodec {
    fn name(&self) -> &'static str {
        NAME
    }

    fn capabilities(&self) -> CodecCapabilities {
        CodecCapabilities::binary()
    }

    fn decode(&self, input: &mut dyn Read, origin: &Endpoint) -> Result<DataValue> {
        ensure_seekable_source(NAME, origin)?;

        let mut bytes = Vec::new();
        input
            .read_to_end(&mut bytes)
            .map_err(|e| OmniError::decode(NAME, e.to_string()))?;

        let mut workbook = Xlsx::new(Cursor::new(bytes))
            .map_err(|e| OmniError::decode(NAME, e.to_string()))?;

        let mut sheets = SheetSet::new();
        for name in workbook.sheet_names() {
            let range = workbook
                .worksheet_range(&name)
                .map_err(|e| OmniError::decode(NAME, format!("sheet '{name}': {e}")))?;
            let rows = range
                .rows()
                .map(|row| row.iter().map(cell_string).collect())
                .collect();
            debug!(sheet = %name, rows = range.height(), "read worksheet");
            sheets.insert(name, Table::new(rows));
        }

        Ok(DataValue::SheetSet(sheets))
    }

    fn encode(&self, value: &DataValue, output: &mut dyn Write, target: &Endpoint) -> Result<()> {
        ensure_file_sink(NAME, target)?;

        let mut workbook = Workbook::new();
        match value {
            DataValue::SheetSet(sheets) if !sheets.is_empty() => {
                for (name, table) in sheets {
                    write_sheet(&mut workbook, name, table)?;
                }
            }
            DataValue::SheetSet(_) => write_sheet(&mut workbook, DEFAULT_SHEET, &Table::default())?,
            DataValue::Table(table) => write_sheet(&mut workbook, DEFAULT_SHEET, table)?,
            DataValue::Tree(tree) => {
                let table = Table::from_records(NAME, tree)?;
                write_sheet(&mut workbook, DEFAULT_SHEET, &table)?;
            }
        }

        let bytes = workbook
            .save_to_buffer()
            .map_err(|e| OmniError::encode(NAME, e.to_string()))?;
        output.write_all(&bytes)?;
        output.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn file_endpoint() -> Endpoint {
        Endpoint::parse("book.xlsx")
    }

    fn round_trip(value: &DataValue) -> SheetSet {
        let mut bytes = Vec::new();
        XlsxCodec.encode(value, &mut bytes, &file_endpoint()).unwrap();
        assert!(bytes.starts_with(b"PK"));

        let decoded = XlsxCodec
            .decode(&mut bytes.as_slice(), &file_endpoint())
            .unwrap();
        decoded.as_sheet_set().cloned().unwrap()
    }

    #[test]
    fn test_sheet_set_round_trip() {
        let mut sheets = SheetSet::new();
        sheets.insert(
            "people".into(),
            Table::new(vec![
                vec!["name".into(), "age".into()],
                vec!["Alice".into(), "30".into()],
            ]),
        );
        sheets.insert(
            "tags".into(),
            Table::new(vec![vec!["tag".into()], vec!["x".into()]]),
        );

        let back = round_trip(&DataValue::SheetSet(sheets.clone()));
        assert_eq!(back, sheets);
    }

    #[test]
    fn test_records_land_in_default_sheet() {
        let back = round_trip(&DataValue::Tree(json!([{"k": "v"}])));
        assert_eq!(back.keys().collect::<Vec<_>>(), ["Sheet1"]);
        assert_eq!(back["Sheet1"].header().unwrap(), ["k"]);
    }

    #[test]
    fn test_refuses_standard_streams() {
        let err = XlsxCodec
            .decode(&mut &b"PK"[..], &Endpoint::Stdio)
            .unwrap_err();
        assert!(matches!(err, OmniError::Decode { .. }));

        let mut out = Vec::new();
        let err = XlsxCodec
            .encode(&DataValue::Table(Table::default()), &mut out, &Endpoint::Stdio)
            .unwrap_err();
        assert!(err.is_encode_error());
        assert!(out.is_empty());
    }

    #[test]
    fn test_decode_garbage() {
        let err = XlsxCodec
            .decode(&mut &b"not a zip"[..], &file_endpoint())
            .unwrap_err();
        assert!(matches!(err, OmniError::Decode { .. }));
    }
}
