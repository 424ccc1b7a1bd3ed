//! Download domain types, events, errors, and outcomes.
//!
//! This module contains pure data types for the download pipeline.
//! No I/O, networking, or runtime dependencies allowed.
//!
//! # Structure
//!
//! - `types` - Media items, stream variants, formats, job ids, audio params
//! - `events` - Status lines, progress updates and the `BatchEvent` union
//! - `errors` - Error taxonomy for the pipeline
//! - `outcome` - Per-item outcomes and the terminal `BatchResult`
//! - `request` - The `DownloadRequest` value a batch is started from

pub mod errors;
pub mod events;
pub mod outcome;
pub mod request;
pub mod types;

pub use errors::{DownloadError, TransferStage};
pub use events::{BatchEvent, Phase, ProgressUpdate, StatusEvent};
pub use outcome::{BatchResult, ItemOutcome, JobFailure};
pub use request::{DownloadRequest, MAX_CONCURRENCY, MIN_CONCURRENCY};
pub use types::{AudioParams, Format, JobId, MediaItem, StreamVariant, VariantKind};
