//! Shared completion counter.

use std::sync::Mutex;

use tubegrab_core::download::ProgressUpdate;
use tubegrab_core::ports::ProgressSink;

/// Counts finished jobs and reports each step to the sink.
///
/// Increment and emission happen under one lock, so the sink sees
/// `completed` strictly increasing even with many workers finishing at once.
#[derive(Debug)]
pub struct ProgressCounter {
    completed: Mutex<u32>,
    total: u32,
}

impl ProgressCounter {
    /// Create a counter for a batch of `total` jobs.
    pub const fn new(total: u32) -> Self {
        Self {
            completed: Mutex::new(0),
            total,
        }
    }

    /// Emit the initial `0 / total` update.
    pub fn announce(&self, sink: &dyn ProgressSink) {
        let completed = self
            .completed
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        sink.on_progress(ProgressUpdate::new(*completed, self.total));
    }

    /// Record one finished job and emit the new value.
    pub fn complete_one(&self, sink: &dyn ProgressSink) -> ProgressUpdate {
        let mut completed = self
            .completed
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *completed = completed.saturating_add(1);
        let update = ProgressUpdate::new(*completed, self.total);
        sink.on_progress(update);
        update
    }
}
