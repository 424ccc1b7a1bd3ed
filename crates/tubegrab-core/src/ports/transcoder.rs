//! Transcoder port.
//!
//! Abstracts the local transcoding executable. The core only needs one
//! operation: convert an input file into an audio file with given parameters.

use std::path::Path;

use async_trait::async_trait;

use crate::download::{AudioParams, DownloadError};

/// Callback receiving the transcoder's progress text, one line at a time.
pub type LineCallback<'a> = &'a (dyn Fn(&str) + Send + Sync);

/// Port for converting downloaded media to the target audio format.
#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Convert `input` to `output`.
    ///
    /// Blocks the calling task until the conversion finishes. Progress lines
    /// are passed to `on_line` verbatim as they arrive.
    async fn convert(
        &self,
        input: &Path,
        output: &Path,
        params: &AudioParams,
        on_line: LineCallback<'_>,
    ) -> Result<(), DownloadError>;
}
