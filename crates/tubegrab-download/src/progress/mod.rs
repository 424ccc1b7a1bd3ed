//! Progress tracking and throttling.
//!
//! This module handles the batch completion counter and rate-limiting of
//! transcoder status lines.

mod counter;
mod throttle;

pub use counter::ProgressCounter;
pub use throttle::ProgressThrottle;
