//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the core domain expects from
//! infrastructure. They contain no implementation details and use only
//! domain types.
//!
//! # Design Rules
//!
//! - No process or network types in any signature
//! - Errors are always `DownloadError`
//! - Sinks are synchronous and must not block

pub mod media_source;
pub mod progress_sink;
pub mod transcoder;

pub use media_source::{MediaItemStream, MediaSource};
pub use progress_sink::{ChannelProgressSink, NoopProgressSink, ProgressSink};
pub use transcoder::{LineCallback, Transcoder};
