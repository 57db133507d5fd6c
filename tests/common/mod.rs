// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Common utilities for integration tests.

#![allow(dead_code)]

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use omnidata::{DataValue, Endpoint, FormatRegistry, Schema, SchemaInferencer};

// ============================================================================
// Temp Directories
// ============================================================================

/// Removes its directory on drop.
#[derive(Debug)]
pub struct CleanupGuard(pub PathBuf);

impl Drop for CleanupGuard {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.0);
    }
}

impl CleanupGuard {
    pub fn path(&self) -> &Path {
        &self.0
    }

    /// Path of `name` inside the directory.
    pub fn join(&self, name: &str) -> PathBuf {
        self.0.join(name)
    }

    /// Write `content` to `name` and return its path.
    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.join(name);
        fs::write(&path, content).expect("write fixture");
        path
    }
}

/// Fresh temp directory, unique per process, thread and call.
pub fn temp_dir(name: &str) -> CleanupGuard {
    let random = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let thread_id = format!("{:?}", std::thread::current().id())
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect::<String>();
    let dir = std::env::temp_dir().join(format!(
        "omnidata_{}_{}_{}_{}",
        name,
        std::process::id(),
        thread_id,
        random
    ));
    fs::create_dir_all(&dir).expect("create temp dir");
    CleanupGuard(dir)
}

// ============================================================================
// Fixtures
// ============================================================================

pub const PEOPLE_CSV: &str = "name,age\nAlice,30\nBob,\n";

pub const ORDERS_JSON: &str = r#"[
  {"id": 1, "customer": "Ann", "total": 12.5, "paid": true},
  {"id": 2, "customer": "Ben", "total": 7, "paid": false},
  {"id": 3, "customer": null, "total": 3.25, "paid": true}
]"#;

// ============================================================================
// Decoding Helpers
// ============================================================================

/// Decode a file with the codec named by its extension.
pub fn decode_path(path: &Path) -> DataValue {
    let registry = FormatRegistry::with_builtin_formats();
    let endpoint = Endpoint::File(path.to_path_buf());
    let name = registry.resolve_name(None, &endpoint).expect("detect format");
    let codec = registry.lookup(&name).expect("lookup codec");
    let mut input = endpoint.open_source().expect("open source");
    codec.decode(&mut input, &endpoint).expect("decode")
}

/// Infer the schema of a file.
pub fn schema_of(path: &Path) -> Schema {
    let registry = FormatRegistry::with_builtin_formats();
    let endpoint = Endpoint::File(path.to_path_buf());
    let name = registry.resolve_name(None, &endpoint).expect("detect format");
    SchemaInferencer::new()
        .infer(&decode_path(path), &name)
        .expect("infer schema")
}

/// Decompress a gzip file into a string.
pub fn gunzip(path: &Path) -> String {
    let file = fs::File::open(path).expect("open gzip file");
    let mut text = String::new();
    GzDecoder::new(file)
        .read_to_string(&mut text)
        .expect("decompress");
    text
}
