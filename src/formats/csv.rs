// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! CSV codec.
//!
//! Decodes to a [`Table`] whose first row is the header. Rows may have
//! differing widths. Encodes a Table as-is, or a Tree of records through
//! [`Table::from_records`]. Supports row-at-a-time reading and writing.

use std::io::{Read, Write};

use csv::{ReaderBuilder, StringRecord, WriterBuilder};

use super::codec::{CodecCapabilities, FormatCodec, RowReader, RowWriter};
use crate::core::{DataValue, OmniError, Result, Table, ValueShape};
use crate::io::Endpoint;

const NAME: &str = "csv";

/// Comma-separated values codec.
#[derive(Debug, Default, Clone, Copy)]
pub struct CsvCodec;

impl CsvCodec {
    pub fn new() -> Self {
        Self
    }
}

fn decode_err(e: csv::Error) -> OmniError {
    OmniError::decode(NAME, e.to_string())
}

fn encode_err(e: csv::Error) -> OmniError {
    OmniError::encode(NAME, e.to_string())
}

fn record_cells(record: &StringRecord) -> Vec<String> {
    record.iter().map(str::to_string).collect()
}

impl FormatCodec for CsvCodec {
    fn name(&self) -> &'static str {
        NAME
    }

    fn capabilities(&self) -> CodecCapabilities {
        CodecCapabilities {
            stream_read: true,
            stream_write: true,
            ..CodecCapabilities::text()
        }
    }

    fn decode(&self, input: &mut dyn Read, _origin: &Endpoint) -> Result<DataValue> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(input);

        let rows = reader
            .records()
            .map(|record| record.map(|r| record_cells(&r)).map_err(decode_err))
            .collect::<Result<Vec<_>>>()?;

        Ok(DataValue::Table(Table::new(rows)))
    }

    fn encode(&self, value: &DataValue, output: &mut dyn Write, _target: &Endpoint) -> Result<()> {
        let owned;
        let table = match value {
            DataValue::Table(table) => table,
            DataValue::Tree(tree) => {
                owned = Table::from_records(NAME, tree)?;
                &owned
            }
            DataValue::SheetSet(_) => {
                return Err(OmniError::type_mismatch(
                    NAME,
                    "table or records",
                    ValueShape::SheetSet,
                ))
            }
        };

        let mut writer = WriterBuilder::new().flexible(true).from_writer(output);
        for row in table.rows() {
            writer.write_record(row).map_err(encode_err)?;
        }
        writer.flush()?;
        Ok(())
    }

    fn row_reader(&self, input: Box<dyn Read>) -> Result<Box<dyn RowReader>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(input);

        let mut first = StringRecord::new();
        let header = if reader.read_record(&mut first).map_err(decode_err)? {
            record_cells(&first)
        } else {
            Vec::new()
        };

        Ok(Box::new(CsvRowReader {
            reader,
            header,
            record: StringRecord::new(),
        }))
    }

    fn row_writer<'a>(
        &self,
        output: &'a mut dyn Write,
        header: &[String],
    ) -> Result<Box<dyn RowWriter + 'a>> {
        let mut writer = WriterBuilder::new().flexible(true).from_writer(output);
        if !header.is_empty() {
            writer.write_record(header).map_err(encode_err)?;
        }
        Ok(Box::new(CsvRowWriter { writer }))
    }
}

struct CsvRowReader {
    reader: csv::Reader<Box<dyn Read>>,
    header: Vec<String>,
    record: StringRecord,
}

impl RowReader for CsvRowReader {
    fn header(&self) -> &[String] {
        &self.header
    }

    fn next_row(&mut self) -> Result<Option<Vec<String>>> {
        if self.reader.read_record(&mut self.record).map_err(decode_err)? {
            Ok(Some(record_cells(&self.record)))
        } else {
            Ok(None)
        }
    }
}

struct CsvRowWriter<'a> {
    writer: csv::Writer<&'a mut dyn Write>,
}

impl RowWriter for CsvRowWriter<'_> {
    fn write_row(&mut self, row: &[String]) -> Result<()> {
        self.writer.write_record(row).map_err(encode_err)
    }

    fn finish(mut self: Box<Self>) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
