//! In-memory `MediaSource` and `Transcoder` fakes.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use futures_util::stream;

use tubegrab_core::download::{AudioParams, DownloadError, MediaItem, StreamVariant};
use tubegrab_core::ports::{LineCallback, MediaItemStream, MediaSource, Transcoder};

/// Tracks how many fetches are in flight and the highest count seen.
#[derive(Debug, Default)]
pub struct ActivityGauge {
    active: AtomicUsize,
    peak: AtomicUsize,
    samples: Mutex<Vec<usize>>,
}

impl ActivityGauge {
    fn enter(&self) {
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        self.samples.lock().unwrap().push(now);
    }

    fn exit(&self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    /// Active count observed each time a fetch started.
    pub fn samples(&self) -> Vec<usize> {
        self.samples.lock().unwrap().clone()
    }
}

/// Scriptable media source.
#[derive(Default)]
pub struct FakeSource {
    /// Items returned for single-video URLs, keyed by URL.
    pub singles: HashMap<String, MediaItem>,
    /// Items every playlist pass yields, in order.
    pub playlist: Vec<MediaItem>,
    /// Fail to open the playlist at all.
    pub playlist_unavailable: bool,
    /// Variants per item id.
    pub variants: HashMap<String, Vec<StreamVariant>>,
    /// Item ids whose fetch fails.
    pub failing_fetches: HashSet<String>,
    /// Time each fetch takes.
    pub fetch_delay: Duration,
    /// In-flight fetch instrumentation.
    pub gauge: ActivityGauge,
    /// Number of `resolve_playlist` calls.
    pub playlist_opens: AtomicUsize,
}

impl FakeSource {
    pub fn with_single(mut self, url: &str, item: MediaItem, variants: Vec<StreamVariant>) -> Self {
        self.variants.insert(item.id.clone(), variants);
        self.singles.insert(url.to_string(), item);
        self
    }

    pub fn with_playlist_item(mut self, item: MediaItem, variants: Vec<StreamVariant>) -> Self {
        self.variants.insert(item.id.clone(), variants);
        self.playlist.push(item);
        self
    }
}

#[async_trait]
impl MediaSource for FakeSource {
    async fn resolve_item(&self, url: &str) -> Result<MediaItem, DownloadError> {
        self.singles
            .get(url)
            .cloned()
            .ok_or_else(|| DownloadError::resolution(format!("unknown video {url}")))
    }

    async fn resolve_playlist(&self, url: &str) -> Result<MediaItemStream, DownloadError> {
        self.playlist_opens.fetch_add(1, Ordering::SeqCst);
        if self.playlist_unavailable {
            return Err(DownloadError::resolution(format!("playlist not found: {url}")));
        }
        let items: Vec<_> = self.playlist.iter().cloned().map(Ok).collect();
        Ok(stream::iter(items).boxed())
    }

    async fn resolve_variants(&self, item_id: &str) -> Result<Vec<StreamVariant>, DownloadError> {
        self.variants
            .get(item_id)
            .cloned()
            .ok_or_else(|| DownloadError::resolution(format!("no metadata for {item_id}")))
    }

    async fn fetch_stream(
        &self,
        item_id: &str,
        _variant: &StreamVariant,
        dest: &Path,
    ) -> Result<(), DownloadError> {
        self.gauge.enter();
        tokio::time::sleep(self.fetch_delay).await;
        let result = if self.failing_fetches.contains(item_id) {
            Err(DownloadError::download_failed("connection reset"))
        } else {
            tokio::fs::write(dest, item_id.as_bytes())
                .await
                .map_err(DownloadError::from)
        };
        self.gauge.exit();
        result
    }
}

/// Transcoder that copies input to output, failing for chosen inputs.
#[derive(Default)]
pub struct FakeTranscoder {
    /// Input file stems that fail to convert.
    pub failing_stems: HashSet<String>,
    /// Number of conversions attempted.
    pub calls: AtomicUsize,
}

#[async_trait]
impl Transcoder for FakeTranscoder {
    async fn convert(
        &self,
        input: &Path,
        output: &Path,
        params: &AudioParams,
        on_line: LineCallback<'_>,
    ) -> Result<(), DownloadError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        on_line(&format!("bitrate={}k", params.bitrate_kbps));

        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        if self.failing_stems.contains(&stem) {
            return Err(DownloadError::transcode_failed("ffmpeg exited with status 1"));
        }

        tokio::fs::copy(input, output).await?;
        Ok(())
    }
}
