//! Download events - status lines, progress ticks and the batch event union.

use serde::{Deserialize, Serialize};

use super::outcome::BatchResult;
use super::types::JobId;

/// Lifecycle phase reported by a status event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Classifying the URL and listing its items.
    Enumerating,
    /// Fetching stream bytes.
    Downloading,
    /// Running the transcoder.
    Converting,
    /// Job finished successfully.
    Complete,
    /// Job (or batch) failed.
    Failed,
}

impl Phase {
    /// Convert to string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Enumerating => "enumerating",
            Self::Downloading => "downloading",
            Self::Converting => "converting",
            Self::Complete => "complete",
            Self::Failed => "failed",
        }
    }
}

/// A human-readable status line.
///
/// Ordering is guaranteed only among events sharing the same `job_id`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEvent {
    /// Job this event belongs to; `None` for batch-level events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<JobId>,
    /// Lifecycle phase.
    pub phase: Phase,
    /// Status text.
    pub message: String,
}

impl StatusEvent {
    /// Create a job-scoped status event.
    pub fn job(job_id: JobId, phase: Phase, message: impl Into<String>) -> Self {
        Self {
            job_id: Some(job_id),
            phase,
            message: message.into(),
        }
    }

    /// Create a batch-level status event.
    pub fn batch(phase: Phase, message: impl Into<String>) -> Self {
        Self {
            job_id: None,
            phase,
            message: message.into(),
        }
    }
}

/// Aggregate batch progress.
///
/// `completed` never decreases within a batch; `total` is fixed once
/// enumeration finishes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    /// Jobs finished so far, regardless of outcome.
    pub completed: u32,
    /// Jobs in the batch.
    pub total: u32,
}

impl ProgressUpdate {
    /// Create a new progress update.
    #[must_use]
    pub const fn new(completed: u32, total: u32) -> Self {
        Self { completed, total }
    }

    /// Whether every job has finished.
    #[must_use]
    pub const fn is_done(&self) -> bool {
        self.completed >= self.total
    }

    /// Completion percentage (0.0 - 100.0).
    #[must_use]
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            f64::from(self.completed) / f64::from(self.total) * 100.0
        }
    }
}

/// Single discriminated union of everything a batch reports.
///
/// Used by channel-based sinks to ship events to another task.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BatchEvent {
    /// A status line.
    Status {
        /// The status event.
        event: StatusEvent,
    },
    /// A progress tick.
    Progress {
        /// The progress update.
        update: ProgressUpdate,
    },
    /// The batch finished.
    Finished {
        /// Terminal aggregate.
        result: BatchResult,
    },
    /// The batch aborted before running any job.
    Aborted {
        /// Human-readable error.
        error: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_names_match_wire_names() {
        for phase in [Phase::Enumerating, Phase::Converting, Phase::Failed] {
            let json = serde_json::to_string(&phase).unwrap();
            assert_eq!(json, format!("\"{}\"", phase.as_str()));
        }
    }

    #[test]
    fn progress_percentage() {
        assert!((ProgressUpdate::new(1, 4).percentage() - 25.0).abs() < f64::EPSILON);
        assert!((ProgressUpdate::new(0, 0).percentage() - 100.0).abs() < f64::EPSILON);
        assert!(ProgressUpdate::new(5, 5).is_done());
    }

    #[test]
    fn batch_status_has_no_job() {
        let event = StatusEvent::batch(Phase::Enumerating, "Counting playlist items");
        assert!(event.job_id.is_none());
        let json = serde_json::to_string(&event).unwrap();
        assert!(!json.contains("job_id"));
    }

    #[test]
    fn batch_event_is_tagged() {
        let event = BatchEvent::Progress {
            update: ProgressUpdate::new(2, 5),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"progress\""));
    }
}
