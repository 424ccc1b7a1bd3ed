//! `yt-dlp` JSON output parsing.
//!
//! Only the fields the pipeline uses are modeled; everything else in the
//! (large) info dict is ignored.

use serde::Deserialize;

use tubegrab_core::download::{MediaItem, StreamVariant, VariantKind};

/// Codec value yt-dlp uses for an absent stream.
const NO_CODEC: &str = "none";

/// Info dict from `--dump-json` on a single video.
#[derive(Debug, Deserialize)]
pub struct VideoInfo {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub formats: Vec<FormatEntry>,
}

/// One entry of `formats`.
#[derive(Debug, Deserialize)]
pub struct FormatEntry {
    pub format_id: String,
    #[serde(default)]
    pub ext: Option<String>,
    #[serde(default)]
    pub vcodec: Option<String>,
    #[serde(default)]
    pub acodec: Option<String>,
    /// Audio bitrate, kbps.
    #[serde(default)]
    pub abr: Option<f64>,
    /// Total bitrate, kbps.
    #[serde(default)]
    pub tbr: Option<f64>,
    #[serde(default)]
    pub height: Option<u32>,
}

/// Line from `--flat-playlist --dump-json`.
#[derive(Debug, Deserialize)]
pub struct FlatEntry {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

impl VideoInfo {
    /// Media item for this video.
    pub fn to_item(&self) -> MediaItem {
        MediaItem::new(self.id.clone(), display_title(self.title.as_deref(), &self.id))
    }

    /// Downloadable variants, in the order yt-dlp listed them.
    pub fn variants(&self) -> Vec<StreamVariant> {
        self.formats.iter().filter_map(FormatEntry::to_variant).collect()
    }
}

impl FormatEntry {
    fn has(codec: Option<&str>) -> Option<bool> {
        codec.map(|c| c != NO_CODEC)
    }

    /// Classify this format. Video-only and unknown formats yield `None`.
    pub fn to_variant(&self) -> Option<StreamVariant> {
        let has_video = Self::has(self.vcodec.as_deref())?;
        let has_audio = Self::has(self.acodec.as_deref())?;

        let (kind, quality) = match (has_video, has_audio) {
            (false, true) => (VariantKind::AudioOnly, kbps(self.abr.or(self.tbr))),
            (true, true) => (
                VariantKind::Muxed,
                self.height.unwrap_or_else(|| kbps(self.tbr)),
            ),
            _ => return None,
        };

        Some(StreamVariant::new(
            self.format_id.clone(),
            kind,
            quality,
            self.ext.clone().unwrap_or_default(),
        ))
    }
}

impl FlatEntry {
    /// Media item for this playlist entry, if it has an id.
    pub fn into_item(self) -> Option<MediaItem> {
        let id = self.id.filter(|id| !id.trim().is_empty())?;
        let title = display_title(self.title.as_deref(), &id);
        Some(MediaItem::new(id, title))
    }
}

fn display_title(title: Option<&str>, id: &str) -> String {
    title
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(id)
        .to_string()
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn kbps(rate: Option<f64>) -> u32 {
    rate.filter(|r| r.is_finite() && *r > 0.0)
        .map_or(0, |r| r.round().min(f64::from(u32::MAX)) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    const INFO: &str = r#"{
        "id": "dQw4w9WgXcQ",
        "title": "Never Gonna Give You Up",
        "formats": [
            {"format_id": "sb0", "ext": "mhtml", "vcodec": "none", "acodec": "none"},
            {"format_id": "139", "ext": "m4a", "vcodec": "none", "acodec": "mp4a.40.5", "abr": 48.8},
            {"format_id": "251", "ext": "webm", "vcodec": "none", "acodec": "opus", "abr": 129.5},
            {"format_id": "18", "ext": "mp4", "vcodec": "avc1.42001E", "acodec": "mp4a.40.2", "height": 360, "tbr": 503.2},
            {"format_id": "137", "ext": "mp4", "vcodec": "avc1.640028", "acodec": "none", "height": 1080}
        ]
    }"#;

    #[test]
    fn classifies_formats() {
        let info: VideoInfo = serde_json::from_str(INFO).unwrap();
        let variants = info.variants();

        assert_eq!(variants.len(), 3);
        assert_eq!(variants[0].format_id, "139");
        assert_eq!(variants[0].kind, VariantKind::AudioOnly);
        assert_eq!(variants[0].quality, 49);
        assert_eq!(variants[1].quality, 130);
        assert_eq!(variants[2].kind, VariantKind::Muxed);
        assert_eq!(variants[2].quality, 360);
        assert_eq!(variants[2].container_hint, "mp4");
    }

    #[test]
    fn item_title_falls_back_to_id() {
        let info: VideoInfo = serde_json::from_str(r#"{"id": "abc", "title": "  "}"#).unwrap();
        let item = info.to_item();
        assert_eq!(item.title, "abc");
        assert!(info.variants().is_empty());
    }

    #[test]
    fn flat_entries_need_an_id() {
        let entry: FlatEntry =
            serde_json::from_str(r#"{"_type": "url", "id": "xyz", "title": "Song"}"#).unwrap();
        assert_eq!(entry.into_item(), Some(MediaItem::new("xyz", "Song")));

        let entry: FlatEntry = serde_json::from_str(r#"{"title": "No id"}"#).unwrap();
        assert!(entry.into_item().is_none());
    }

    #[test]
    fn bitrate_rounding() {
        assert_eq!(kbps(Some(127.6)), 128);
        assert_eq!(kbps(None), 0);
        assert_eq!(kbps(Some(f64::NAN)), 0);
        assert_eq!(kbps(Some(-3.0)), 0);
    }
}
