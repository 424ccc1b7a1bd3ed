//! Error types for the external tool adapters.
//!
//! Adapter errors carry process detail; they are narrowed to
//! `DownloadError` at the port boundary.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use tubegrab_core::download::DownloadError;

/// Errors locating an external executable.
#[derive(Debug, Error)]
pub enum BinaryError {
    /// Not on `PATH` and no override set.
    #[error("{name} not found on PATH. Install it or set {env_var}")]
    NotFound { name: String, env_var: String },

    /// Override points at a missing file.
    #[error("{env_var} points to {path}, which does not exist")]
    BadOverride { env_var: String, path: PathBuf },
}

/// Errors from the `yt-dlp` adapter.
#[derive(Debug, Error)]
pub enum YtDlpError {
    /// The process could not be started.
    #[error("Failed to start yt-dlp: {0}")]
    Spawn(#[source] std::io::Error),

    /// The process exited unsuccessfully.
    #[error("yt-dlp failed: {0}")]
    Failed(String),

    /// Output was not the JSON we expected.
    #[error("yt-dlp returned invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// A fetch finished but left no file behind.
    #[error("yt-dlp reported success but {0} was not written")]
    MissingOutput(PathBuf),

    /// Reading process output failed.
    #[error("Failed to read yt-dlp output: {0}")]
    Io(#[source] std::io::Error),
}

impl YtDlpError {
    /// Narrow to a lookup failure.
    pub fn into_resolution(self) -> DownloadError {
        DownloadError::resolution(self.to_string())
    }

    /// Narrow to a download failure.
    pub fn into_download(self) -> DownloadError {
        DownloadError::download_failed(self.to_string())
    }
}

/// Errors from the `ffmpeg` adapter.
#[derive(Debug, Error)]
pub enum FfmpegError {
    /// The process could not be started.
    #[error("Failed to start ffmpeg: {0}")]
    Spawn(#[source] std::io::Error),

    /// The process exited unsuccessfully.
    #[error("ffmpeg failed: {0}")]
    Failed(String),

    /// The conversion ran past its deadline and was killed.
    #[error("ffmpeg timed out after {0:?}")]
    TimedOut(Duration),

    /// Waiting on the process failed.
    #[error("Failed to wait for ffmpeg: {0}")]
    Io(#[source] std::io::Error),
}

impl From<FfmpegError> for DownloadError {
    fn from(err: FfmpegError) -> Self {
        Self::transcode_failed(err.to_string())
    }
}
