//! Per-item outcomes and the terminal batch aggregate.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::errors::DownloadError;
use super::types::JobId;

/// Result of processing one job.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemOutcome {
    /// The output file was written.
    Success {
        /// Final output path.
        path: PathBuf,
    },
    /// The item has no stream matching the format. Not a fault.
    Skipped {
        /// Why the item was skipped.
        reason: String,
    },
    /// Resolution, download or transcode failed.
    Error {
        /// The failure.
        error: DownloadError,
    },
    /// The batch was cancelled before this job could finish.
    Cancelled,
}

impl ItemOutcome {
    /// Whether this outcome counts toward `succeeded`.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Whether this outcome counts toward `failed`.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Skipped { .. } | Self::Error { .. })
    }

    /// Status text describing a failed outcome.
    #[must_use]
    pub fn failure_message(&self) -> Option<String> {
        match self {
            Self::Skipped { reason } => Some(reason.clone()),
            Self::Error { error } => Some(error.user_message()),
            Self::Success { .. } | Self::Cancelled => None,
        }
    }
}

/// One failed job in a batch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobFailure {
    /// The failed job.
    pub job_id: JobId,
    /// Human-readable reason.
    pub message: String,
}

/// Terminal aggregate returned once every dispatched job has finished.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResult {
    /// Jobs that produced an output file.
    pub succeeded: u32,
    /// Jobs that errored or were skipped.
    pub failed: u32,
    /// Jobs that never started because the batch was cancelled.
    pub cancelled: u32,
    /// Failures in the order they were recorded.
    pub errors: Vec<JobFailure>,
    /// Whether cancellation was requested during the batch.
    pub was_cancelled: bool,
}

impl BatchResult {
    /// Create an empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one job's outcome into the aggregate.
    pub fn record(&mut self, job_id: &JobId, outcome: &ItemOutcome) {
        match outcome {
            ItemOutcome::Success { .. } => self.succeeded += 1,
            ItemOutcome::Skipped { .. } | ItemOutcome::Error { .. } => {
                self.failed += 1;
                self.errors.push(JobFailure {
                    job_id: job_id.clone(),
                    message: outcome.failure_message().unwrap_or_default(),
                });
            }
            ItemOutcome::Cancelled => self.cancelled += 1,
        }
    }

    /// Jobs accounted for so far.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.succeeded + self.failed + self.cancelled
    }

    /// Whether every job succeeded.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.failed == 0 && self.cancelled == 0
    }
}
