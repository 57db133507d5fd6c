// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! JSON codec.
//!
//! Decodes to a Tree with key order preserved. Tables are encoded as an array
//! of records and sheet sets as an object mapping sheet name to records.
//! The row writer emits the same array-of-records layout one row at a time.

use std::io::{Read, Write};

use serde_json::{Map, Value as JsonValue};

use super::codec::{CodecCapabilities, FormatCodec, RowWriter};
use crate::core::{DataValue, OmniError, RecordKeys, Result, SheetSet};
use crate::io::Endpoint;

const NAME: &str = "json";

/// JSON codec.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonCodec;

impl JsonCodec {
    pub fn new() -> Self {
        Self
    }
}

/// Sheet name -> records, in sheet order.
pub(crate) fn sheets_to_tree(sheets: &SheetSet) -> JsonValue {
    let obj: Map<String, JsonValue> = sheets
        .iter()
        .map(|(name, table)| (name.clone(), table.to_records()))
        .collect();
    JsonValue::Object(obj)
}

/// Tree view of any value, as used by the tree-shaped text formats.
pub(crate) fn value_to_tree(value: &DataValue) -> JsonValue {
    match value {
        DataValue::Tree(tree) => tree.clone(),
        DataValue::Table(table) => table.to_records(),
        DataValue::SheetSet(sheets) => sheets_to_tree(sheets),
    }
}

impl FormatCodec for JsonCodec {
    fn name(&self) -> &'static str {
        NAME
    }

    fn capabilities(&self) -> CodecCapabilities {
        CodecCapabilities {
            stream_write: true,
            ..CodecCapabilities::text()
        }
    }

    fn decode(&self, input: &mut dyn Read, _origin: &Endpoint) -> Result<DataValue> {
        let tree: JsonValue =
            serde_json::from_reader(input).map_err(|e| OmniError::decode(NAME, e.to_string()))?;
        Ok(DataValue::Tree(tree))
    }

    fn encode(&self, value: &DataValue, output: &mut dyn Write, _target: &Endpoint) -> Result<()> {
        let tree = value_to_tree(value);
        serde_json::to_writer_pretty(&mut *output, &tree)
            .map_err(|e| OmniError::encode(NAME, e.to_string()))?;
        output.write_all(b"\n")?;
        Ok(())
    }

    fn row_writer<'a>(
        &self,
        output: &'a mut dyn Write,
        header: &[String],
    ) -> Result<Box<dyn RowWriter + 'a>> {
        output.write_all(b"[")?;
        Ok(Box::new(JsonRowWriter {
            output,
            keys: RecordKeys::new(header),
            rows: 0,
        }))
    }
}

struct JsonRowWriter<'a> {
    output: &'a mut dyn Write,
    keys: RecordKeys,
    rows: usize,
}

impl RowWriter for JsonRowWriter<'_> {
    fn write_row(&mut self, row: &[String]) -> Result<()> {
        let sep: &[u8] = if self.rows == 0 { b"\n  " } else { b",\n  " };
        self.output.write_all(sep)?;
        let record = JsonValue::Object(self.keys.record(row));
        serde_json::to_writer(&mut *self.output, &record)
            .map_err(|e| OmniError::encode(NAME, e.to_string()))?;
        self.rows += 1;
        Ok(())
    }

    fn finish(self: Box<Self>) -> Result<()> {
        let tail: &[u8] = if self.rows == 0 { b"]\n" } else { b"\n]\n" };
        self.output.write_all(tail)?;
        self.output.flush()?;
        Ok(())
    }
}
