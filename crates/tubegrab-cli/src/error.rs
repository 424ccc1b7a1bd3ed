//! CLI-specific error types and exit codes.

use thiserror::Error;
use tubegrab_core::{DownloadError, PathError, SettingsError};
use tubegrab_runtime::BinaryError;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid argument values.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// Missing or invalid settings.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Filesystem failure.
    #[error("IO error: {0}")]
    Io(String),

    /// A required external tool is unavailable.
    #[error("{0}")]
    Dependency(String),

    /// The batch could not start.
    #[error("{0}")]
    Batch(String),

    /// The batch ran but some items failed.
    #[error("{failed} of {total} item(s) failed")]
    PartialFailure { failed: u32, total: u32 },

    /// The user interrupted the batch.
    #[error("Cancelled")]
    Cancelled,
}

impl CliError {
    /// Map error to a process exit code.
    ///
    /// Follows sysexits.h where a category fits.
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Batch(_) | Self::PartialFailure { .. } => 1,
            Self::Arguments(_) => 2, // EX_USAGE
            Self::Dependency(_) => 69, // EX_UNAVAILABLE
            Self::Io(_) => 74,       // EX_IOERR
            Self::Config(_) => 78,   // EX_CONFIG
            Self::Cancelled => 130,
        }
    }
}

impl From<DownloadError> for CliError {
    fn from(err: DownloadError) -> Self {
        match err {
            DownloadError::Cancelled => Self::Cancelled,
            DownloadError::Config { message } => Self::Config(message),
            DownloadError::Io { .. } => Self::Io(err.user_message()),
            other => Self::Batch(other.user_message()),
        }
    }
}

impl From<SettingsError> for CliError {
    fn from(err: SettingsError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<PathError> for CliError {
    fn from(err: PathError) -> Self {
        match err {
            PathError::NoConfigDir => Self::Config(err.to_string()),
            _ => Self::Io(err.to_string()),
        }
    }
}

impl From<BinaryError> for CliError {
    fn from(err: BinaryError) -> Self {
        Self::Dependency(err.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
