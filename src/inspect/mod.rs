// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Dataset inspection: peek at one dataset, or diff the schemas of two.
//!
//! Loading a dataset goes through the same checks as a conversion source
//! (format lookup, availability, path resolution) and failures are reported
//! as [`OmniError::JobFailed`](crate::OmniError::JobFailed).

pub mod preview;

use serde::Serialize;
use tracing::debug;

use crate::convert::state::JobTracker;
use crate::convert::{JobStage, JobState};
use crate::core::{DataValue, OmniError, Result};
use crate::formats::FormatRegistry;
use crate::io::Endpoint;
use crate::schema::{compare, Schema, SchemaDiff, SchemaInferencer};

pub use preview::Preview;

/// A decoded dataset and the format it was decoded with.
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub source: Endpoint,
    pub format: String,
    pub value: DataValue,
}

/// Decode a whole dataset.
pub fn load(
    registry: &FormatRegistry,
    source: &Endpoint,
    format: Option<&str>,
) -> Result<LoadedDataset> {
    let mut tracker = JobTracker::new();

    let format = registry
        .resolve_name(format, source)
        .map_err(tracker.fail(JobStage::Validate, source))?;
    let codec = registry
        .lookup(&format)
        .map_err(tracker.fail(JobStage::Validate, &format))?;
    if !codec.capabilities().available {
        let err = codec
            .decode(&mut std::io::empty(), source)
            .err()
            .unwrap_or_else(|| OmniError::unsupported_format(&format, "format is not available"));
        return Err(tracker.fail(JobStage::Validate, &format)(err));
    }
    tracker.advance(JobState::Validated);

    source
        .resolve_source()
        .map_err(tracker.fail(JobStage::Resolve, source))?;
    tracker.advance(JobState::PathsResolved);

    let value = source
        .open_source()
        .and_then(|mut input| codec.decode(&mut input, source))
        .map_err(tracker.fail(JobStage::Decode, source))?;
    tracker.advance(JobState::Decoded);
    debug!(source = %source, format = %format, shape = %value.shape(), "dataset loaded");

    Ok(LoadedDataset {
        source: source.clone(),
        format,
        value,
    })
}

impl LoadedDataset {
    /// Infer the dataset's schema. Failures name the source.
    pub fn infer(&self, inferencer: &SchemaInferencer) -> Result<Schema> {
        inferencer.infer(&self.value, &self.format).map_err(|err| {
            OmniError::job_failed(JobStage::Infer, JobState::Decoded, self.source.to_string(), err)
        })
    }
}

/// Schema plus the first rows of a dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeekReport {
    pub source: String,
    pub schema: Schema,
    pub preview: Preview,
}

/// Load a dataset, infer its schema and take a preview of `rows` rows.
pub fn peek(
    registry: &FormatRegistry,
    inferencer: &SchemaInferencer,
    source: &Endpoint,
    format: Option<&str>,
    rows: usize,
) -> Result<PeekReport> {
    let dataset = load(registry, source, format)?;
    let schema = dataset.infer(inferencer)?;
    let preview = Preview::from_value(&dataset.value, rows);
    Ok(PeekReport {
        source: source.to_string(),
        schema,
        preview,
    })
}

/// Schemas of two datasets and their differences.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiffReport {
    pub source1: String,
    pub source2: String,
    pub schema1: Schema,
    pub schema2: Schema,
    pub diff: SchemaDiff,
}

/// Compare the schemas of two datasets.
///
/// At most one side may read standard input.
pub fn diff(
    registry: &FormatRegistry,
    inferencer: &SchemaInferencer,
    (source1, format1): (&Endpoint, Option<&str>),
    (source2, format2): (&Endpoint, Option<&str>),
) -> Result<DiffReport> {
    if source1.is_stdio() && source2.is_stdio() {
        return Err(OmniError::path(
            source2.to_string(),
            "standard input can only be read once",
        ));
    }

    let first = load(registry, source1, format1)?;
    let second = load(registry, source2, format2)?;
    let schema1 = first.infer(inferencer)?;
    let schema2 = second.infer(inferencer)?;
    let diff = compare(&schema1, &schema2);

    debug!(
        added = diff.added.len(),
        removed = diff.removed.len(),
        changed = diff.changed.len(),
        "schemas compared"
    );

    Ok(DiffReport {
        source1: source1.to_string(),
        source2: source2.to_string(),
        schema1,
        schema2,
        diff,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "omnidata_inspect_{}_{}",
            std::process::id(),
            name
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_peek_csv() {
        let dir = scratch("peek");
        let path = dir.join("people.csv");
        fs::write(&path, "name,age\nAlice,30\nBob,\nCara,41\n").unwrap();

        let registry = FormatRegistry::with_builtin_formats();
        let report = peek(
            &registry,
            &SchemaInferencer::new(),
            &Endpoint::File(path),
            None,
            2,
        )
        .unwrap();

        assert_eq!(report.schema.source_format, "csv");
        assert_eq!(report.schema.row_count, 3);
        assert_eq!(report.preview.rows.len(), 2);
        assert_eq!(report.preview.columns, ["name", "age"]);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_diff_csv_against_json() {
        let dir = scratch("diff");
        let old = dir.join("old.csv");
        let new = dir.join("new.json");
        fs::write(&old, "id,name\n1,Ann\n").unwrap();
        fs::write(&new, r#"[{"id": 1, "name": "Ann", "email": "a@x"}]"#).unwrap();

        let registry = FormatRegistry::with_builtin_formats();
        let report = diff(
            &registry,
            &SchemaInferencer::new(),
            (&Endpoint::File(old), None),
            (&Endpoint::File(new), None),
        )
        .unwrap();

        assert_eq!(report.diff.added.len(), 1);
        assert_eq!(report.diff.added[0].name, "email");
        assert!(report.diff.removed.is_empty());
        assert_eq!(report.diff.unchanged.len(), 2);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_diff_rejects_double_stdin() {
        let registry = FormatRegistry::with_builtin_formats();
        let err = diff(
            &registry,
            &SchemaInferencer::new(),
            (&Endpoint::Stdio, Some("csv")),
            (&Endpoint::Stdio, Some("csv")),
        )
        .unwrap_err();
        assert!(matches!(err, OmniError::PathResolution { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let registry = FormatRegistry::with_builtin_formats();
        let err = load(&registry, &Endpoint::parse("/nonexistent/omnidata.csv"), None)
            .unwrap_err();
        assert!(matches!(
            err,
            OmniError::JobFailed {
                stage: JobStage::Resolve,
                last_state: JobState::Validated,
                ..
            }
        ));
    }

    #[test]
    fn test_inference_failure_names_source() {
        let dir = scratch("infer_error");
        let path = dir.join("scalar.json");
        fs::write(&path, "42").unwrap();

        let registry = FormatRegistry::with_builtin_formats();
        let err = peek(
            &registry,
            &SchemaInferencer::new(),
            &Endpoint::File(path.clone()),
            None,
            5,
        )
        .unwrap_err();

        match &err {
            OmniError::JobFailed {
                stage,
                last_state,
                resource,
                ..
            } => {
                assert_eq!(*stage, JobStage::Infer);
                assert_eq!(*last_state, JobState::Decoded);
                assert_eq!(resource, &path.display().to_string());
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(err.root_cause(), OmniError::SchemaInference { .. }));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_load_placeholder() {
        let registry = FormatRegistry::with_builtin_formats();
        let err = load(&registry, &Endpoint::parse("data.avro"), None).unwrap_err();
        assert!(matches!(
            err.root_cause(),
            OmniError::OptionalDependencyMissing { .. }
        ));
    }
}
