//! Core domain types and port definitions for tubegrab.
//!
//! Everything here is free of process, network and terminal concerns.
//! Adapters live in `tubegrab-runtime`; the pipeline lives in
//! `tubegrab-download`.

#![deny(unused_crate_dependencies)]

pub mod download;
pub mod paths;
pub mod ports;
pub mod settings;
pub mod utils;

pub use download::{
    AudioParams, BatchEvent, BatchResult, DownloadError, DownloadRequest, Format, ItemOutcome,
    JobFailure, JobId, MAX_CONCURRENCY, MIN_CONCURRENCY, MediaItem, Phase, ProgressUpdate,
    StatusEvent, StreamVariant, TransferStage, VariantKind,
};
pub use paths::{
    CONFIG_ENV_VAR, PathError, config_dir, ensure_directory, load_settings, save_settings,
    settings_file_path,
};
pub use ports::{
    ChannelProgressSink, LineCallback, MediaItemStream, MediaSource, NoopProgressSink,
    ProgressSink, Transcoder,
};
pub use settings::{DEFAULT_CONCURRENCY, Settings, SettingsError, Theme, validate_settings};
pub use utils::{is_reserved_char, sanitize_file_name};
