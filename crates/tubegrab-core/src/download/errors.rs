//! Download error types.
//!
//! These errors are serializable and do not wrap external error types like
//! `std::io::Error`. For I/O errors, we capture the kind and message as
//! strings.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::types::Format;

/// Which step of a transfer failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferStage {
    /// Fetching the stream bytes to disk.
    Download,
    /// Running the transcoder subprocess.
    Transcode,
}

impl std::fmt::Display for TransferStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Download => "download",
            Self::Transcode => "transcode",
        })
    }
}

/// Error type for the download pipeline.
///
/// Per-item errors are converted into an `ItemOutcome` at the item boundary;
/// only batch-fatal errors (see [`DownloadError::is_batch_fatal`]) ever reach
/// the caller of a batch.
#[derive(Clone, Debug, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum DownloadError {
    /// The media source could not resolve a URL, item or its variants.
    #[error("Resolution failed: {message}")]
    Resolution {
        /// Detailed error message.
        message: String,
    },

    /// No stream matches the requested output format.
    #[error("No suitable stream for {format}")]
    NoVariant {
        /// The requested format.
        format: Format,
    },

    /// Download or transcode failure.
    #[error("Transfer failed during {stage}: {message}")]
    Transfer {
        /// Step that failed.
        stage: TransferStage,
        /// Detailed error message.
        message: String,
    },

    /// Missing or invalid settings before a batch starts.
    #[error("Configuration error: {message}")]
    Config {
        /// Detailed error message.
        message: String,
    },

    /// I/O error during file operations.
    #[error("I/O error ({kind}): {message}")]
    Io {
        /// The kind of I/O error (e.g., "NotFound", "PermissionDenied").
        kind: String,
        /// Detailed error message.
        message: String,
    },

    /// The batch was cancelled by the caller.
    #[error("Download cancelled")]
    Cancelled,
}

impl DownloadError {
    /// Create a resolution error.
    pub fn resolution(message: impl Into<String>) -> Self {
        Self::Resolution {
            message: message.into(),
        }
    }

    /// Create a no-suitable-stream error.
    #[must_use]
    pub const fn no_variant(format: Format) -> Self {
        Self::NoVariant { format }
    }

    /// Create a download-stage transfer error.
    pub fn download_failed(message: impl Into<String>) -> Self {
        Self::Transfer {
            stage: TransferStage::Download,
            message: message.into(),
        }
    }

    /// Create a transcode-stage transfer error.
    pub fn transcode_failed(message: impl Into<String>) -> Self {
        Self::Transfer {
            stage: TransferStage::Transcode,
            message: message.into(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an I/O error from kind and message strings.
    pub fn io(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Io {
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// Create an I/O error from a `std::io::Error`.
    #[must_use]
    pub fn from_io_error(err: &std::io::Error) -> Self {
        let kind = err.kind();
        Self::Io {
            kind: format!("{kind:?}"),
            message: err.to_string(),
        }
    }

    /// Whether this error aborts a whole batch when raised outside a job.
    #[must_use]
    pub const fn is_batch_fatal(&self) -> bool {
        matches!(
            self,
            Self::Resolution { .. } | Self::Config { .. } | Self::Cancelled
        )
    }

    /// Check if this is a cancellation.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Convert to a user-friendly status line.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Resolution { message } => format!("Could not resolve media: {message}"),
            Self::NoVariant { .. } => "No suitable stream found.".to_string(),
            Self::Transfer {
                stage: TransferStage::Download,
                message,
            } => format!("Download failed: {message}"),
            Self::Transfer {
                stage: TransferStage::Transcode,
                message,
            } => format!("Conversion failed: {message}"),
            Self::Config { message } => message.clone(),
            Self::Io { message, .. } => format!("File operation failed: {message}"),
            Self::Cancelled => "Download was cancelled.".to_string(),
        }
    }
}

impl From<std::io::Error> for DownloadError {
    fn from(err: std::io::Error) -> Self {
        Self::from_io_error(&err)
    }
}
