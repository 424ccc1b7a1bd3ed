//! Line throttling.
//!
//! Rate-limits transcoder progress lines so a chatty subprocess cannot
//! flood the sink with status events.

use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Rate-limiter shared by the callbacks of one job.
///
/// Callable through `&self` so it can live inside a `Fn` callback that
/// the transcoder invokes from its reader task.
#[derive(Debug)]
pub struct ProgressThrottle {
    last_emit: Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl ProgressThrottle {
    /// Create a new throttle with the specified minimum interval.
    pub const fn new(min_interval: Duration) -> Self {
        Self {
            last_emit: Mutex::new(None),
            min_interval,
        }
    }

    /// Create a throttle with a default interval of 100ms.
    pub const fn default_interval() -> Self {
        Self::new(Duration::from_millis(100))
    }

    /// Check if enough time has passed to emit another line.
    pub fn should_emit(&self) -> bool {
        self.should_emit_at(Instant::now())
    }

    fn should_emit_at(&self, now: Instant) -> bool {
        let mut last_emit = self
            .last_emit
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        match *last_emit {
            Some(last) if now.saturating_duration_since(last) < self.min_interval => false,
            _ => {
                *last_emit = Some(now);
                true
            }
        }
    }
}
