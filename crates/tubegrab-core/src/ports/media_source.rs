//! Media source port.
//!
//! Abstracts the remote metadata/stream-resolution service. Implementations
//! resolve URLs to items, items to variants, and stream bytes to disk.

use std::path::Path;

use async_trait::async_trait;
use futures_util::stream::BoxStream;

use crate::download::{DownloadError, MediaItem, StreamVariant};

/// Lazy, finite, non-restartable sequence of playlist items.
///
/// To traverse a playlist twice, call [`MediaSource::resolve_playlist`] again.
pub type MediaItemStream = BoxStream<'static, Result<MediaItem, DownloadError>>;

/// Port for resolving and fetching remote media.
///
/// Errors are expected to be `DownloadError::Resolution` for lookups and
/// `DownloadError::Transfer` for `fetch_stream`.
#[async_trait]
pub trait MediaSource: Send + Sync {
    /// Resolve a single-video URL.
    async fn resolve_item(&self, url: &str) -> Result<MediaItem, DownloadError>;

    /// Start enumerating a playlist URL.
    async fn resolve_playlist(&self, url: &str) -> Result<MediaItemStream, DownloadError>;

    /// List the stream variants available for an item.
    async fn resolve_variants(&self, item_id: &str) -> Result<Vec<StreamVariant>, DownloadError>;

    /// Stream the chosen variant's bytes to `dest`.
    async fn fetch_stream(
        &self,
        item_id: &str,
        variant: &StreamVariant,
        dest: &Path,
    ) -> Result<(), DownloadError>;
}
