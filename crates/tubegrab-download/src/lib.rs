//! Download pipeline for tubegrab.
//!
//! - `variant_selector` - picks the stream to fetch for a target format
//! - `manager` - the batch orchestrator, its worker pool and per-item pipeline
//! - `progress` - completion counter and transcoder line throttling

// Re-export core types for convenience
pub use tubegrab_core::download::{
    AudioParams, BatchEvent, BatchResult, DownloadError, DownloadRequest, Format, ItemOutcome,
    JobId, MediaItem, Phase, ProgressUpdate, StatusEvent, StreamVariant, VariantKind,
};
pub use tubegrab_core::ports::{MediaSource, ProgressSink, Transcoder};

// Completion counting and transcoder line throttling
pub(crate) mod progress;
pub use progress::{ProgressCounter, ProgressThrottle};

// Variant selection service
mod variant_selector;
pub use variant_selector::{SelectionError, VariantSelection, VariantSelector};

// Public API - batch orchestrator
mod manager;

pub use manager::{
    DownloadOrchestrator, Job, JobPaths, OrchestratorDeps, WorkerDeps, build_orchestrator,
    process_job,
};

