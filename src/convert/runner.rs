// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Conversion runner.
//!
//! Runs one [`ConversionJob`] to a single terminal outcome:
//!
//! 1. **Validate**: both formats resolve in the registry, the same-format
//!    policy holds, both codecs are available, binary codecs are not pointed
//!    at standard streams.
//! 2. **Resolve**: the source exists and is a file; the sink does not exist
//!    (unless overwriting) and is not the source itself. Skipped for the sink
//!    in dry runs.
//! 3. **Dry run**: decode the source to surface content errors, then report.
//!    No sink is created.
//! 4. **Transcode**: decode fully then encode (whole-file), or interleave rows
//!    when streaming was requested and both codecs support it.
//!
//! Gzip on either side is handled by the endpoint streams. A sink file created
//! by a job that then fails is removed; an overwritten sink keeps its previous
//! content when the job fails.

use std::fs;
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::job::{ConversionJob, ConversionReport};
use super::state::{JobStage, JobState, JobTracker};
use crate::core::{DataValue, OmniError, Result};
use crate::formats::{FormatCodec, FormatRegistry, RowReader};
use crate::io::{Endpoint, SinkStream};

/// What to do when source and target formats are the same.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SameFormatPolicy {
    /// Permit it as a normalization pass (e.g., csv -> csv.gz)
    #[default]
    Allow,
    /// Reject it during validation
    Reject,
}

/// Codecs and names chosen during validation.
struct ValidatedJob {
    source_format: String,
    target_format: String,
    source_codec: Arc<dyn FormatCodec>,
    target_codec: Arc<dyn FormatCodec>,
}

/// Runs conversion jobs against a format registry.
pub struct ConversionRunner<'r> {
    registry: &'r FormatRegistry,
    same_format: SameFormatPolicy,
}

impl<'r> ConversionRunner<'r> {
    /// Create a runner that allows same-format conversion.
    pub fn new(registry: &'r FormatRegistry) -> Self {
        Self {
            registry,
            same_format: SameFormatPolicy::default(),
        }
    }

    /// Set the same-format policy.
    pub fn with_same_format_policy(mut self, policy: SameFormatPolicy) -> Self {
        self.same_format = policy;
        self
    }

    /// Registry the runner resolves formats against.
    pub fn registry(&self) -> &FormatRegistry {
        self.registry
    }

    /// Run a job.
    ///
    /// # Errors
    ///
    /// Every failure is an [`OmniError::JobFailed`] naming the stage, the last
    /// state reached, and the resource involved.
    pub fn run(&self, job: &ConversionJob) -> Result<ConversionReport> {
        let mut tracker = JobTracker::new();

        let validated = self.validate(job, &tracker)?;
        tracker.advance(JobState::Validated);

        self.resolve(job)
            .map_err(tracker.fail(JobStage::Resolve, resolve_resource(job)))?;
        tracker.advance(JobState::PathsResolved);

        let report = |state, streamed_rows| ConversionReport {
            source: job.source.clone(),
            sink: job.sink.clone(),
            source_format: validated.source_format.clone(),
            target_format: validated.target_format.clone(),
            dry_run: job.dry_run,
            streamed_rows,
            state,
        };

        if job.dry_run {
            self.decode_source(&*validated.source_codec, &job.source)
                .map_err(tracker.fail(JobStage::Decode, &job.source))?;
            tracker.advance(JobState::DryRunReported);
            let report = report(JobState::DryRunReported, None);
            info!(
                source = %job.source,
                sink = %job.sink,
                from = %validated.source_format,
                to = %validated.target_format,
                "dry run succeeded"
            );
            return Ok(report);
        }

        let streamed_rows = if job.stream && self.can_stream(&validated) {
            Some(self.run_streaming(job, &validated, &mut tracker)?)
        } else {
            if job.stream {
                warn!(
                    from = %validated.source_format,
                    to = %validated.target_format,
                    "streaming not supported for this format pair, using whole-file mode"
                );
            }
            self.run_whole(job, &validated, &mut tracker)?;
            None
        };

        tracker.advance(JobState::Reported);
        info!(
            source = %job.source,
            sink = %job.sink,
            from = %validated.source_format,
            to = %validated.target_format,
            streamed_rows = ?streamed_rows,
            "conversion complete"
        );
        Ok(report(JobState::Reported, streamed_rows))
    }

    fn validate(&self, job: &ConversionJob, tracker: &JobTracker) -> Result<ValidatedJob> {
        let source_format = self
            .registry
            .resolve_name(job.source_format.as_deref(), &job.source)
            .map_err(tracker.fail(JobStage::Validate, &job.source))?;
        let target_format = self
            .registry
            .resolve_name(job.target_format.as_deref(), &job.sink)
            .map_err(tracker.fail(JobStage::Validate, &job.sink))?;

        let source_codec = self
            .registry
            .lookup(&source_format)
            .map_err(tracker.fail(JobStage::Validate, &source_format))?;
        let target_codec = self
            .registry
            .lookup(&target_format)
            .map_err(tracker.fail(JobStage::Validate, &target_format))?;

        if source_format == target_format && self.same_format == SameFormatPolicy::Reject {
            return Err(tracker.fail(JobStage::Validate, &source_format)(
                OmniError::unsupported_format(
                    &source_format,
                    "source and target formats are the same",
                ),
            ));
        }

        for (codec, endpoint, is_source) in [
            (&source_codec, &job.source, true),
            (&target_codec, &job.sink, false),
        ] {
            preflight(&**codec, endpoint, is_source, job.dry_run)
                .map_err(tracker.fail(JobStage::Validate, codec.name()))?;
        }

        debug!(from = %source_format, to = %target_format, "formats validated");
        Ok(ValidatedJob {
            source_format,
            target_format,
            source_codec,
            target_codec,
        })
    }

    fn resolve(&self, job: &ConversionJob) -> Result<()> {
        job.source.resolve_source()?;
        if job.dry_run {
            return Ok(());
        }
        job.sink.resolve_sink(job.overwrite)?;

        if let (Some(src), Some(dst)) = (job.source.path(), job.sink.path()) {
            if let (Ok(a), Ok(b)) = (fs::canonicalize(src), fs::canonicalize(dst)) {
                if a == b {
                    return Err(OmniError::path(
                        dst.display().to_string(),
                        "sink is the same file as the source",
                    ));
                }
            }
        }
        Ok(())
    }

    fn decode_source(&self, codec: &dyn FormatCodec, source: &Endpoint) -> Result<DataValue> {
        let mut input = source.open_source()?;
        codec.decode(&mut input, source)
    }

    fn can_stream(&self, validated: &ValidatedJob) -> bool {
        validated.source_codec.capabilities().stream_read
            && validated.target_codec.capabilities().stream_write
    }

    fn run_whole(
        &self,
        job: &ConversionJob,
        validated: &ValidatedJob,
        tracker: &mut JobTracker,
    ) -> Result<()> {
        let value = self
            .decode_source(&*validated.source_codec, &job.source)
            .map_err(tracker.fail(JobStage::Decode, &job.source))?;
        debug!(shape = %value.shape(), "source decoded");
        tracker.advance(JobState::Decoded);

        let fresh = is_fresh_sink(&job.sink);
        let sink = job
            .sink
            .create_sink(job.overwrite)
            .map_err(tracker.fail(JobStage::Encode, &job.sink))?;

        let written = write_value(&*validated.target_codec, &value, sink, &job.sink);
        if let Err(err) = written {
            if fresh {
                remove_partial(&job.sink);
            }
            return Err(tracker.fail(JobStage::Encode, &job.sink)(err));
        }
        tracker.advance(JobState::Encoded);
        Ok(())
    }

    fn run_streaming(
        &self,
        job: &ConversionJob,
        validated: &ValidatedJob,
        tracker: &mut JobTracker,
    ) -> Result<usize> {
        let mut reader = job
            .source
            .open_source()
            .and_then(|input| validated.source_codec.row_reader(input.into_inner()))
            .map_err(tracker.fail(JobStage::Decode, &job.source))?;

        let fresh = is_fresh_sink(&job.sink);
        let sink = job
            .sink
            .create_sink(job.overwrite)
            .map_err(tracker.fail(JobStage::Encode, &job.sink))?;

        match copy_rows(&*validated.target_codec, &mut *reader, sink) {
            Ok(rows) => {
                tracker.advance(JobState::Decoded);
                tracker.advance(JobState::Encoded);
                debug!(rows, "rows streamed");
                Ok(rows)
            }
            Err((stage, err)) => {
                if fresh {
                    remove_partial(&job.sink);
                }
                let resource = match stage {
                    JobStage::Decode => &job.source,
                    _ => &job.sink,
                };
                Err(tracker.fail(stage, resource)(err))
            }
        }
    }
}

/// Resource name for resolve failures.
fn resolve_resource(job: &ConversionJob) -> String {
    if job.dry_run || job.sink.is_stdio() {
        job.source.to_string()
    } else {
        format!("{} -> {}", job.source, job.sink)
    }
}

/// Checks that need no I/O: availability and standard-stream support.
fn preflight(
    codec: &dyn FormatCodec,
    endpoint: &Endpoint,
    is_source: bool,
    dry_run: bool,
) -> Result<()> {
    let caps = codec.capabilities();
    if !caps.available {
        // Let the codec produce its own dependency error
        let err = if is_source {
            codec
                .decode(&mut std::io::empty(), endpoint)
                .err()
        } else {
            codec
                .encode(&DataValue::Tree(serde_json::Value::Null), &mut std::io::sink(), endpoint)
                .err()
        };
        return Err(err.unwrap_or_else(|| {
            OmniError::unsupported_format(codec.name(), "format is not available in this build")
        }));
    }

    if caps.binary && endpoint.is_stdio() {
        if is_source {
            return Err(OmniError::decode(
                codec.name(),
                "reading from standard input is not supported for this binary format",
            ));
        }
        if !dry_run {
            return Err(OmniError::encode(
                codec.name(),
                "writing to standard output is not supported for this binary format",
            ));
        }
    }
    Ok(())
}

fn write_value(
    codec: &dyn FormatCodec,
    value: &DataValue,
    mut sink: SinkStream,
    target: &Endpoint,
) -> Result<()> {
    codec.encode(value, &mut sink, target)?;
    sink.finish()
}

fn copy_rows(
    codec: &dyn FormatCodec,
    reader: &mut dyn RowReader,
    mut sink: SinkStream,
) -> std::result::Result<usize, (JobStage, OmniError)> {
    let header = reader.header().to_vec();
    let mut rows = 0;
    {
        let mut writer = codec
            .row_writer(&mut sink, &header)
            .map_err(|e| (JobStage::Encode, e))?;
        // Row N is fully read before it is written
        while let Some(row) = reader.next_row().map_err(|e| (JobStage::Decode, e))? {
            writer.write_row(&row).map_err(|e| (JobStage::Encode, e))?;
            rows += 1;
        }
        writer.finish().map_err(|e| (JobStage::Encode, e))?;
    }
    sink.finish().map_err(|e| (JobStage::Encode, e))?;
    Ok(rows)
}

/// Whether the job is about to create the sink file. An existing file being
/// overwritten is staged by the sink stream and survives a failed job.
fn is_fresh_sink(sink: &Endpoint) -> bool {
    sink.path().is_some_and(|path| !path.exists())
}

/// Remove a sink file left behind by a failed job.
fn remove_partial(sink: &Endpoint) {
    let Some(path) = sink.path() else {
        return;
    };
    match fs::remove_file(path) {
        Ok(()) => warn!(path = %path.display(), "removed partial output"),
        Err(e) => warn!(path = %path.display(), error = %e, "failed to remove partial output"),
    }
}
