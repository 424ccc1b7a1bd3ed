//! Progress sink port.
//!
//! The caller-owned surface the orchestrator pushes status and progress to.
//! Any thread-affinity the caller needs (UI thread marshaling, terminal
//! redraws) belongs in the implementation, not the core.

use tokio::sync::mpsc;

use crate::download::{BatchEvent, BatchResult, DownloadError, ProgressUpdate, StatusEvent};

/// Port for receiving batch status and progress.
///
/// Methods are called concurrently from several workers and must not block.
/// `on_progress` calls are serialized by the orchestrator so `completed`
/// arrives in increasing order.
pub trait ProgressSink: Send + Sync {
    /// A status line for a job or for the batch.
    fn on_status(&self, event: &StatusEvent);

    /// Aggregate progress changed.
    fn on_progress(&self, update: ProgressUpdate);

    /// Every dispatched job has finished.
    fn on_finished(&self, _result: &BatchResult) {}

    /// The batch aborted before any job ran.
    fn on_batch_failed(&self, _error: &DownloadError) {}
}

/// A sink that discards everything.
///
/// Suitable for tests and callers that only want the returned `BatchResult`.
#[derive(Debug, Clone, Default)]
pub struct NoopProgressSink;

impl NoopProgressSink {
    /// Create a new no-op sink.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ProgressSink for NoopProgressSink {
    fn on_status(&self, _event: &StatusEvent) {}

    fn on_progress(&self, _update: ProgressUpdate) {}
}

/// Sink that forwards every call as a [`BatchEvent`] over a channel.
///
/// Lets a consumer task (UI loop, web socket) own rendering while workers
/// only enqueue. Events sent after the receiver is dropped are discarded.
#[derive(Debug, Clone)]
pub struct ChannelProgressSink {
    tx: mpsc::UnboundedSender<BatchEvent>,
}

impl ChannelProgressSink {
    /// Create a sink and the receiver its events arrive on.
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<BatchEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn send(&self, event: BatchEvent) {
        let _ = self.tx.send(event);
    }
}

impl ProgressSink for ChannelProgressSink {
    fn on_status(&self, event: &StatusEvent) {
        self.send(BatchEvent::Status {
            event: event.clone(),
        });
    }

    fn on_progress(&self, update: ProgressUpdate) {
        self.send(BatchEvent::Progress { update });
    }

    fn on_finished(&self, result: &BatchResult) {
        self.send(BatchEvent::Finished {
            result: result.clone(),
        });
    }

    fn on_batch_failed(&self, error: &DownloadError) {
        self.send(BatchEvent::Aborted {
            error: error.user_message(),
        });
    }
}
