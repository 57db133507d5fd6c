// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Format registry.
//!
//! Maps a lower-cased format name to its codec. The registry is an explicit
//! object: build it once at startup (usually with
//! [`FormatRegistry::with_builtin_formats`]) and pass it by reference to the
//! runner and the inspection commands.
//!
//! # Example
//!
//! ```
//! use omnidata::formats::FormatRegistry;
//!
//! let registry = FormatRegistry::with_builtin_formats();
//! assert!(registry.contains("CSV"));
//! let codec = registry.lookup("json").unwrap();
//! assert_eq!(codec.name(), "json");
//! ```

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use super::codec::FormatCodec;
use crate::core::{OmniError, Result};
use crate::io::{detect_format, Endpoint};

/// Registry of format codecs keyed by lower-cased name.
#[derive(Default)]
pub struct FormatRegistry {
    // RwLock so late registration cannot race with lookups
    formats: RwLock<HashMap<String, Arc<dyn FormatCodec>>>,
}

impl FormatRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with every built-in codec registered.
    pub fn with_builtin_formats() -> Self {
        let registry = Self::new();
        super::register_builtin_formats(&registry);
        registry
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Arc<dyn FormatCodec>>> {
        self.formats.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Arc<dyn FormatCodec>>> {
        self.formats.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a codec under a name.
    ///
    /// The name is lower-cased. Registering an existing name replaces the
    /// previous codec.
    pub fn register(&self, name: &str, codec: Arc<dyn FormatCodec>) {
        let key = name.to_ascii_lowercase();
        if self.write().insert(key.clone(), codec).is_some() {
            debug!(format = %key, "replaced registered codec");
        }
    }

    /// Register a codec under its own name.
    pub fn register_codec(&self, codec: Arc<dyn FormatCodec>) {
        let name = codec.name();
        self.register(name, codec);
    }

    /// Get a codec by name, case-insensitively.
    pub fn get(&self, name: &str) -> Option<Arc<dyn FormatCodec>> {
        self.read().get(&name.to_ascii_lowercase()).cloned()
    }

    /// Get a codec by name.
    ///
    /// # Errors
    ///
    /// Returns [`OmniError::UnsupportedFormat`] if the name is not registered.
    pub fn lookup(&self, name: &str) -> Result<Arc<dyn FormatCodec>> {
        self.get(name)
            .ok_or_else(|| OmniError::unsupported_format(name, "not registered"))
    }

    /// Check if a name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.read().contains_key(&name.to_ascii_lowercase())
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of registered codecs.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Check if no codec is registered.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Pick a format for an endpoint.
    ///
    /// An explicit name always wins. Otherwise the format is detected from
    /// the path and must be registered.
    pub fn resolve_name(&self, explicit: Option<&str>, endpoint: &Endpoint) -> Result<String> {
        if let Some(name) = explicit {
            return Ok(name.to_ascii_lowercase());
        }

        let detected = detect_format(endpoint).ok_or_else(|| {
            OmniError::unsupported_format(
                endpoint.to_string(),
                "cannot detect format; specify it explicitly",
            )
        })?;
        debug!(endpoint = %endpoint, format = detected, "detected format");
        Ok(detected.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DataValue;
    use std::io::{Read, Write};

    struct NamedCodec(&'static str);

    impl FormatCodec for NamedCodec {
        fn name(&self) -> &'static str {
            self.0
        }

        fn decode(&self, _input: &mut dyn Read, _origin: &Endpoint) -> Result<DataValue> {
            Ok(DataValue::Tree(serde_json::Value::String(self.0.into())))
        }

        fn encode(
            &self,
            _value: &DataValue,
            _output: &mut dyn Write,
            _target: &Endpoint,
        ) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_register_is_case_insensitive() {
        let registry = FormatRegistry::new();
        registry.register("Mock", Arc::new(NamedCodec("mock")));

        assert!(registry.contains("mock"));
        assert!(registry.contains("MOCK"));
        assert_eq!(registry.names(), vec!["mock".to_string()]);
        assert_eq!(registry.lookup("MoCk").unwrap().name(), "mock");
    }

    #[test]
    fn test_last_registration_wins() {
        let registry = FormatRegistry::new();
        registry.register("fmt", Arc::new(NamedCodec("first")));
        registry.register("FMT", Arc::new(NamedCodec("second")));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.lookup("fmt").unwrap().name(), "second");
    }

    #[test]
    fn test_lookup_unknown() {
        let registry = FormatRegistry::new();
        assert!(registry.is_empty());
        let err = registry.lookup("toml").err().unwrap();
        assert!(matches!(err, OmniError::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_builtin_formats() {
        let registry = FormatRegistry::with_builtin_formats();
        for name in ["csv", "json", "yaml", "xml", "xlsx", "avro", "parquet", "sql"] {
            assert!(registry.contains(name), "missing {name}");
        }
        assert!(!registry.lookup("avro").unwrap().capabilities().available);
        assert!(registry.lookup("csv").unwrap().capabilities().stream_read);
    }

    #[test]
    fn test_resolve_name() {
        let registry = FormatRegistry::with_builtin_formats();
        let endpoint = Endpoint::parse("data.yml.gz");
        assert_eq!(registry.resolve_name(None, &endpoint).unwrap(), "yaml");
        assert_eq!(
            registry.resolve_name(Some("JSON"), &endpoint).unwrap(),
            "json"
        );
        assert!(registry.resolve_name(None, &Endpoint::Stdio).is_err());
    }
}
