// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Format detection from file names and magic numbers.
//!
//! Used when a job omits its source or target format. Detection looks at the
//! file extension first (ignoring a trailing `.gz`), then falls back to
//! sniffing the first bytes of an existing, uncompressed file.
//!
//! # Example
//!
//! ```rust
//! use omnidata::io::detection::detect_from_extension;
//!
//! assert_eq!(detect_from_extension("people.csv.gz".as_ref()), Some("csv"));
//! assert_eq!(detect_from_extension("config.yml".as_ref()), Some("yaml"));
//! ```

use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::endpoint::Endpoint;

/// Detect the format of an endpoint, or `None` for standard streams and
/// unrecognized files.
pub fn detect_format(endpoint: &Endpoint) -> Option<&'static str> {
    let path = endpoint.path()?;

    if let Some(format) = detect_from_extension(path) {
        return Some(format);
    }

    if endpoint.is_gzip() {
        return None;
    }

    // Error reading file: nothing to sniff
    detect_from_magic(path).ok().flatten()
}

/// Map a file extension to a format name.
pub fn detect_from_extension(path: &Path) -> Option<&'static str> {
    let mut path = path;
    let stripped;
    if path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("gz"))
    {
        stripped = path.with_extension("");
        path = &stripped;
    }

    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "csv" => Some("csv"),
        "json" => Some("json"),
        "yaml" | "yml" => Some("yaml"),
        "xml" => Some("xml"),
        "xlsx" => Some("xlsx"),
        "avro" => Some("avro"),
        "parquet" => Some("parquet"),
        "sql" | "db" | "sqlite" => Some("sql"),
        _ => None,
    }
}

/// Detect format by reading the first bytes of a file.
fn detect_from_magic(path: &Path) -> std::io::Result<Option<&'static str>> {
    let mut file = File::open(path)?;
    let mut header = [0u8; 512];
    let n = file.read(&mut header)?;
    Ok(sniff(&header[..n]))
}

fn sniff(header: &[u8]) -> Option<&'static str> {
    if header.starts_with(b"PK\x03\x04") {
        return Some("xlsx");
    }
    if header.starts_with(b"Obj\x01") {
        return Some("avro");
    }
    if header.starts_with(b"PAR1") {
        return Some("parquet");
    }

    // Skip leading whitespace and a UTF-8 byte order mark
    let first = header
        .iter()
        .copied()
        .find(|b| !(b.is_ascii_whitespace() || matches!(b, 0xEF | 0xBB | 0xBF)))?;
    match first {
        b'{' | b'[' => Some("json"),
        b'<' => Some("xml"),
        _ => None,
    }
}
