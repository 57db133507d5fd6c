// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Placeholder codecs for formats whose backing library is not part of this
//! build. They register under their real name so that lookups succeed and the
//! runner can report "not available" before opening any stream.

use std::io::{Read, Write};

use super::codec::{CodecCapabilities, FormatCodec};
use crate::core::{DataValue, OmniError, Result};
use crate::io::Endpoint;

/// Codec that always fails with [`OmniError::OptionalDependencyMissing`].
#[derive(Debug, Clone, Copy)]
pub struct PlaceholderCodec {
    name: &'static str,
    dependency: &'static str,
}

impl PlaceholderCodec {
    /// Create a placeholder for `name` that needs `dependency`.
    pub const fn new(name: &'static str, dependency: &'static str) -> Self {
        Self { name, dependency }
    }

    /// Library or feature the format needs.
    pub fn dependency(&self) -> &'static str {
        self.dependency
    }

    fn missing(&self) -> OmniError {
        OmniError::dependency_missing(self.name, self.dependency)
    }
}

impl FormatCodec for PlaceholderCodec {
    fn name(&self) -> &'static str {
        self.name
    }

    fn capabilities(&self) -> CodecCapabilities {
        CodecCapabilities::unavailable()
    }

    fn decode(&self, _input: &mut dyn Read, _origin: &Endpoint) -> Result<DataValue> {
        Err(self.missing())
    }

    fn encode(&self, _value: &DataValue, _output: &mut dyn Write, _target: &Endpoint) -> Result<()> {
        Err(self.missing())
    }
}
