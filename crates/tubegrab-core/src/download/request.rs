//! Batch request value.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::errors::DownloadError;
use super::types::Format;

/// Lowest accepted worker count.
pub const MIN_CONCURRENCY: u32 = 1;

/// Highest accepted worker count.
pub const MAX_CONCURRENCY: u32 = 10;

/// Substring that marks a URL as a playlist.
const PLAYLIST_MARKER: &str = "playlist";

/// Request to download one video or a whole playlist.
///
/// Immutable once submitted to the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadRequest {
    /// Video or playlist URL.
    pub url: String,
    /// Target output type.
    pub format: Format,
    /// Directory receiving output (and temporary) files.
    pub output_dir: PathBuf,
    /// Maximum number of jobs running at once.
    pub concurrency_limit: u32,
}

impl DownloadRequest {
    /// Create a new request with a single worker.
    pub fn new(url: impl Into<String>, format: Format, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            url: url.into(),
            format,
            output_dir: output_dir.into(),
            concurrency_limit: MIN_CONCURRENCY,
        }
    }

    /// Set the concurrency limit.
    #[must_use]
    pub const fn with_concurrency(mut self, limit: u32) -> Self {
        self.concurrency_limit = limit;
        self
    }

    /// Whether the URL names a playlist rather than a single video.
    #[must_use]
    pub fn is_playlist(&self) -> bool {
        self.url.contains(PLAYLIST_MARKER)
    }

    /// Check the request before a batch begins.
    pub fn validate(&self) -> Result<(), DownloadError> {
        if self.url.trim().is_empty() {
            return Err(DownloadError::config("URL cannot be empty"));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(DownloadError::config("Output directory cannot be empty"));
        }
        if !(MIN_CONCURRENCY..=MAX_CONCURRENCY).contains(&self.concurrency_limit) {
            return Err(DownloadError::config(format!(
                "Concurrency limit must be between {MIN_CONCURRENCY} and {MAX_CONCURRENCY}, got {}",
                self.concurrency_limit
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn playlist_detection_uses_marker() {
        let playlist = DownloadRequest::new(
            "https://www.youtube.com/playlist?list=PL123",
            Format::Mp3,
            "/music",
        );
        let video = DownloadRequest::new(
            "https://www.youtube.com/watch?v=abc",
            Format::Mp3,
            "/music",
        );
        assert!(playlist.is_playlist());
        assert!(!video.is_playlist());
    }

    #[test]
    fn validate_accepts_bounds() {
        let req = DownloadRequest::new("https://x/watch?v=1", Format::Mp4, "/out");
        assert!(req.clone().with_concurrency(1).validate().is_ok());
        assert!(req.with_concurrency(10).validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_values() {
        let req = DownloadRequest::new("https://x/watch?v=1", Format::Mp4, "/out");
        assert!(matches!(
            req.clone().with_concurrency(0).validate(),
            Err(DownloadError::Config { .. })
        ));
        assert!(req.clone().with_concurrency(11).validate().is_err());
        assert!(
            DownloadRequest::new("  ", Format::Mp4, "/out")
                .validate()
                .is_err()
        );
        assert!(
            DownloadRequest::new("https://x", Format::Mp4, "")
                .validate()
                .is_err()
        );
    }
}
