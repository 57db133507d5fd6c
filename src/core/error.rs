// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core error types for omnidata.
//!
//! Provides error types for every stage of a job:
//! - Format selection and registry lookups
//! - Endpoint (path/stream) resolution
//! - Decoding and encoding through codecs
//! - Schema inference
//!
//! Runner failures are wrapped in [`OmniError::JobFailed`], which records the
//! stage that failed, the last state the job reached, and the resource involved.

use thiserror::Error;

use crate::convert::{JobStage, JobState};
use crate::core::value::ValueShape;

/// Errors that can occur while converting or inspecting a dataset.
#[derive(Debug, Error)]
pub enum OmniError {
    /// Format name is not registered, or the selection violates policy
    #[error("Unsupported format '{name}': {reason}")]
    UnsupportedFormat {
        /// Format name as given by the caller
        name: String,
        /// Why the format was rejected
        reason: String,
    },

    /// Source or sink could not be resolved
    #[error("Cannot resolve path '{path}': {reason}")]
    PathResolution {
        /// Path that failed to resolve
        path: String,
        /// Resolution failure
        reason: String,
    },

    /// Malformed or unreadable source content
    #[error("{format} decode error: {message}")]
    Decode {
        /// Codec that was decoding
        format: String,
        /// Error message
        message: String,
    },

    /// Sink medium unsupported, or the encoder itself failed
    #[error("{format} encode error: {message}")]
    Encode {
        /// Codec that was encoding
        format: String,
        /// Error message
        message: String,
    },

    /// Value shape does not match what the codec can represent
    #[error("{format} cannot encode a {found} value (expected {expected})")]
    TypeMismatch {
        /// Codec that rejected the value
        format: String,
        /// Shapes the codec accepts
        expected: String,
        /// Shape that was supplied
        found: ValueShape,
    },

    /// Placeholder codec invoked without its backing library
    #[error("Format '{format}' requires optional dependency '{dependency}', which is not part of this build")]
    OptionalDependencyMissing {
        /// Format name
        format: String,
        /// Library or feature the format needs
        dependency: String,
    },

    /// Value shape is not recognized for the stated origin
    #[error("Cannot infer schema for {origin} data: {reason}")]
    SchemaInference {
        /// Origin format of the value
        origin: String,
        /// Failure reason
        reason: String,
    },

    /// Configuration file could not be read or parsed
    #[error("Invalid configuration '{path}': {message}")]
    Config {
        /// Config file path
        path: String,
        /// Error message
        message: String,
    },

    /// A conversion job failed at a given stage
    #[error("{stage} failed for '{resource}' (last state: {last_state}): {source}")]
    JobFailed {
        /// Stage that failed
        stage: JobStage,
        /// Last state the job reached before failing
        last_state: JobState,
        /// Path or format the stage was working on
        resource: String,
        /// Underlying error
        #[source]
        source: Box<OmniError>,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("Other error: {0}")]
    Other(String),
}

impl OmniError {
    /// Create an "unsupported format" error.
    pub fn unsupported_format(name: impl Into<String>, reason: impl Into<String>) -> Self {
        OmniError::UnsupportedFormat {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a path resolution error.
    pub fn path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        OmniError::PathResolution {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a decode error.
    pub fn decode(format: impl Into<String>, message: impl Into<String>) -> Self {
        OmniError::Decode {
            format: format.into(),
            message: message.into(),
        }
    }

    /// Create an encode error.
    pub fn encode(format: impl Into<String>, message: impl Into<String>) -> Self {
        OmniError::Encode {
            format: format.into(),
            message: message.into(),
        }
    }

    /// Create a type mismatch error.
    pub fn type_mismatch(
        format: impl Into<String>,
        expected: impl Into<String>,
        found: ValueShape,
    ) -> Self {
        OmniError::TypeMismatch {
            format: format.into(),
            expected: expected.into(),
            found,
        }
    }

    /// Create an "optional dependency missing" error.
    pub fn dependency_missing(format: impl Into<String>, dependency: impl Into<String>) -> Self {
        OmniError::OptionalDependencyMissing {
            format: format.into(),
            dependency: dependency.into(),
        }
    }

    /// Create a schema inference error.
    pub fn inference(origin: impl Into<String>, reason: impl Into<String>) -> Self {
        OmniError::SchemaInference {
            origin: origin.into(),
            reason: reason.into(),
        }
    }

    /// Wrap an error with the job stage and resource it occurred in.
    pub fn job_failed(
        stage: JobStage,
        last_state: JobState,
        resource: impl Into<String>,
        source: OmniError,
    ) -> Self {
        OmniError::JobFailed {
            stage,
            last_state,
            resource: resource.into(),
            source: Box::new(source),
        }
    }

    /// Innermost error, skipping any job wrappers.
    pub fn root_cause(&self) -> &OmniError {
        match self {
            OmniError::JobFailed { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Whether the failure belongs to the encode class (including shape mismatches).
    pub fn is_encode_error(&self) -> bool {
        matches!(
            self.root_cause(),
            OmniError::Encode { .. } | OmniError::TypeMismatch { .. }
        )
    }

    /// Get structured fields for logging.
    pub fn log_fields(&self) -> Vec<(&'static str, String)> {
        match self {
            OmniError::UnsupportedFormat { name, reason } => {
                vec![("format", name.clone()), ("reason", reason.clone())]
            }
            OmniError::PathResolution { path, reason } => {
                vec![("path", path.clone()), ("reason", reason.clone())]
            }
            OmniError::Decode { format, message } | OmniError::Encode { format, message } => {
                vec![("format", format.clone()), ("message", message.clone())]
            }
            OmniError::TypeMismatch {
                format,
                expected,
                found,
            } => vec![
                ("format", format.clone()),
                ("expected", expected.clone()),
                ("found", found.to_string()),
            ],
            OmniError::OptionalDependencyMissing { format, dependency } => {
                vec![("format", format.clone()), ("dependency", dependency.clone())]
            }
            OmniError::SchemaInference { origin, reason } => {
                vec![("origin", origin.clone()), ("reason", reason.clone())]
            }
            OmniError::Config { path, message } => {
                vec![("path", path.clone()), ("message", message.clone())]
            }
            OmniError::JobFailed {
                stage,
                last_state,
                resource,
                source,
            } => vec![
                ("stage", stage.to_string()),
                ("last_state", last_state.to_string()),
                ("resource", resource.clone()),
                ("cause", source.to_string()),
            ],
            OmniError::Io(err) => vec![("message", err.to_string())],
            OmniError::Other(msg) => vec![("message", msg.clone())],
        }
    }
}

/// Result type for omnidata operations.
pub type Result<T> = std::result::Result<T, OmniError>;
