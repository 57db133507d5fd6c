// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Job stages and states.
//!
//! A job moves through
//! `Pending -> Validated -> PathsResolved -> {DryRunReported | Decoded -> Encoded -> Reported}`.
//! Any step can fail; the failure records the stage that was running and the
//! last state reached. There is no retry.

use std::fmt;

use tracing::debug;

use crate::core::OmniError;

/// Step of a conversion job that can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobStage {
    /// Format lookup and policy checks
    Validate,
    /// Source and sink endpoint checks
    Resolve,
    /// Reading the source
    Decode,
    /// Writing the sink
    Encode,
    /// Inferring the schema of a loaded dataset
    Infer,
}

impl fmt::Display for JobStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JobStage::Validate => "validate",
            JobStage::Resolve => "resolve",
            JobStage::Decode => "decode",
            JobStage::Encode => "encode",
            JobStage::Infer => "infer",
        };
        f.write_str(name)
    }
}

/// Last successful state of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobState {
    Pending,
    Validated,
    PathsResolved,
    DryRunReported,
    Decoded,
    Encoded,
    Reported,
}

impl JobState {
    /// Whether the job has reached a successful terminal state.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobState::DryRunReported | JobState::Reported)
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JobState::Pending => "pending",
            JobState::Validated => "validated",
            JobState::PathsResolved => "paths-resolved",
            JobState::DryRunReported => "dry-run-reported",
            JobState::Decoded => "decoded",
            JobState::Encoded => "encoded",
            JobState::Reported => "reported",
        };
        f.write_str(name)
    }
}

/// Tracks the current state of one job and wraps its failures.
#[derive(Debug)]
pub(crate) struct JobTracker {
    state: JobState,
}

impl JobTracker {
    pub(crate) fn new() -> Self {
        Self {
            state: JobState::Pending,
        }
    }

    pub(crate) fn state(&self) -> JobState {
        self.state
    }

    pub(crate) fn advance(&mut self, next: JobState) {
        debug!(from = %self.state, to = %next, "job state");
        self.state = next;
    }

    /// Error mapper for a failing stage.
    pub(crate) fn fail(
        &self,
        stage: JobStage,
        resource: impl fmt::Display,
    ) -> impl FnOnce(OmniError) -> OmniError {
        let last_state = self.state;
        let resource = resource.to_string();
        move |err| OmniError::job_failed(stage, last_state, resource, err)
    }
}
