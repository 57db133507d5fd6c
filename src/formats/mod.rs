// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Format codecs and the registry that names them.
//!
//! | name | decodes to | streaming |
//! |------|------------|-----------|
//! | csv | Table | read + write |
//! | json | Tree | write |
//! | yaml | Tree | - |
//! | xml | Tree | - |
//! | xlsx | SheetSet | - |
//! | avro, parquet, sql | unavailable | - |

pub mod codec;
pub mod csv;
pub mod json;
pub mod placeholder;
pub mod registry;
#[cfg(feature = "xlsx")]
pub mod xlsx;
pub mod xml;
pub mod yaml;

use std::sync::Arc;

pub use codec::{CodecCapabilities, FormatCodec, RowReader, RowWriter};
pub use self::csv::CsvCodec;
pub use json::JsonCodec;
pub use placeholder::PlaceholderCodec;
pub use registry::FormatRegistry;
#[cfg(feature = "xlsx")]
pub use xlsx::XlsxCodec;
pub use xml::XmlCodec;
pub use yaml::YamlCodec;

/// Register every built-in codec.
pub fn register_builtin_formats(registry: &FormatRegistry) {
    registry.register_codec(Arc::new(CsvCodec::new()));
    registry.register_codec(Arc::new(JsonCodec::new()));
    registry.register_codec(Arc::new(YamlCodec::new()));
    registry.register_codec(Arc::new(XmlCodec::new()));

    #[cfg(feature = "xlsx")]
    registry.register_codec(Arc::new(XlsxCodec::new()));
    #[cfg(not(feature = "xlsx"))]
    registry.register_codec(Arc::new(PlaceholderCodec::new(
        "xlsx",
        "calamine + rust_xlsxwriter (feature `xlsx`)",
    )));

    registry.register_codec(Arc::new(PlaceholderCodec::new("avro", "apache-avro")));
    registry.register_codec(Arc::new(PlaceholderCodec::new("parquet", "parquet")));
    registry.register_codec(Arc::new(PlaceholderCodec::new("sql", "database driver")));
}
