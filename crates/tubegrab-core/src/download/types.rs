//! Core domain types for downloads.
//!
//! Pure data types with no I/O dependencies.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One downloadable unit (a single video) as reported by the media source.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MediaItem {
    /// Source-specific identifier (e.g. a video id).
    pub id: String,
    /// Human-readable title, used to derive the output filename.
    pub title: String,
}

impl MediaItem {
    /// Create a new media item.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

/// What a stream variant carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariantKind {
    /// Audio track only, no video.
    AudioOnly,
    /// Audio and video in one container.
    Muxed,
}

/// One quality/format rendition of a media item.
///
/// The core never mutates the set of variants a source returns; it only
/// selects from it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StreamVariant {
    /// Opaque handle the media source uses to fetch this rendition.
    pub format_id: String,
    /// Audio-only or muxed.
    pub kind: VariantKind,
    /// Ordinal quality: bitrate in kbps for audio, or a comparable rank.
    pub quality: u32,
    /// Container extension hint (e.g. "mp4", "webm", "m4a").
    pub container_hint: String,
}

impl StreamVariant {
    /// Create a new variant.
    pub fn new(
        format_id: impl Into<String>,
        kind: VariantKind,
        quality: u32,
        container_hint: impl Into<String>,
    ) -> Self {
        Self {
            format_id: format_id.into(),
            kind,
            quality,
            container_hint: container_hint.into(),
        }
    }
}

/// Caller-selected target output type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Video with audio, saved as-is.
    Mp4,
    /// Audio only, transcoded to MP3.
    #[default]
    Mp3,
}

impl Format {
    /// File extension of the final output.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Mp4 => "mp4",
            Self::Mp3 => "mp3",
        }
    }

    /// Variant kind this format downloads.
    #[must_use]
    pub const fn required_kind(self) -> VariantKind {
        match self {
            Self::Mp4 => VariantKind::Muxed,
            Self::Mp3 => VariantKind::AudioOnly,
        }
    }

    /// Whether a transcode step follows the download.
    #[must_use]
    pub const fn needs_transcode(self) -> bool {
        matches!(self, Self::Mp3)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Mp4 => "MP4",
            Self::Mp3 => "MP3",
        })
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mp4" => Ok(Self::Mp4),
            "mp3" => Ok(Self::Mp3),
            other => Err(format!("unknown format '{other}' (expected mp3 or mp4)")),
        }
    }
}

/// Identifier for one job within a batch.
///
/// Renders as `#<position> <item id>`; positions are 1-based in enumeration
/// order.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId {
    position: u32,
    item_id: String,
}

impl JobId {
    /// Create a job id for the item at `position` (1-based).
    pub fn new(position: u32, item_id: impl Into<String>) -> Self {
        Self {
            position,
            item_id: item_id.into(),
        }
    }

    /// 1-based position in the batch.
    #[must_use]
    pub const fn position(&self) -> u32 {
        self.position
    }

    /// Id of the media item this job processes.
    #[must_use]
    pub fn item_id(&self) -> &str {
        &self.item_id
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}", self.position, self.item_id)
    }
}

/// Audio parameters handed to the transcoder.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioParams {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Channel count.
    pub channels: u8,
    /// Target bitrate in kbps.
    pub bitrate_kbps: u32,
    /// Parallelism hint for the transcoder.
    pub thread_hint: usize,
}

impl AudioParams {
    /// 44.1 kHz stereo at 320 kbps, one thread per available core.
    #[must_use]
    pub fn mp3_default() -> Self {
        Self {
            sample_rate: 44_100,
            channels: 2,
            bitrate_kbps: 320,
            thread_hint: num_cpus::get(),
        }
    }
}

impl Default for AudioParams {
    fn default() -> Self {
        Self::mp3_default()
    }
}
