//! Stream variant selection.
//!
//! Centralizes the rule for choosing which stream to fetch so the worker and
//! any preview surface agree on the pick.
//!
//! # Selection Rules
//!
//! 1. Keep only variants whose kind matches the target format
//!    (audio-only for MP3, muxed audio+video for MP4)
//! 2. Pick the one with the highest quality
//! 3. Ties go to the variant listed first
//!
//! Containers are never compared: the transcoder accepts any audio input
//! and MP4 output keeps whatever container the source offered.

use tubegrab_core::download::{DownloadError, Format, StreamVariant, VariantKind};

/// Result of variant selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantSelection {
    /// The chosen variant.
    pub variant: StreamVariant,
    /// How many variants matched the target kind.
    pub candidates: usize,
}

/// Error details for selection failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    /// No variant of the required kind exists.
    NotFound {
        format: Format,
        required: VariantKind,
        offered: usize,
    },
}

impl std::fmt::Display for SelectionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound {
                format,
                required,
                offered,
            } => write!(
                f,
                "No {required:?} stream for {format} among {offered} variant(s)"
            ),
        }
    }
}

impl From<SelectionError> for DownloadError {
    fn from(err: SelectionError) -> Self {
        match err {
            SelectionError::NotFound { format, .. } => Self::no_variant(format),
        }
    }
}

/// Stateless variant chooser.
#[derive(Debug, Clone, Copy, Default)]
pub struct VariantSelector;

impl VariantSelector {
    /// Choose the best variant for `format`.
    pub fn select(
        variants: &[StreamVariant],
        format: Format,
    ) -> Result<VariantSelection, SelectionError> {
        let required = format.required_kind();
        let mut best: Option<&StreamVariant> = None;
        let mut candidates = 0;

        for variant in variants.iter().filter(|v| v.kind == required) {
            candidates += 1;
            // Strictly greater keeps the first of equal-quality variants.
            if best.is_none_or(|b| variant.quality > b.quality) {
                best = Some(variant);
            }
        }

        best.map(|variant| VariantSelection {
            variant: variant.clone(),
            candidates,
        })
        .ok_or(SelectionError::NotFound {
            format,
            required,
            offered: variants.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn audio(id: &str, quality: u32) -> StreamVariant {
        StreamVariant::new(id, VariantKind::AudioOnly, quality, "webm")
    }

    fn muxed(id: &str, quality: u32) -> StreamVariant {
        StreamVariant::new(id, VariantKind::Muxed, quality, "mp4")
    }

    #[test]
    fn test_mp3_picks_highest_audio() {
        let variants = vec![audio("a128", 128), audio("a160", 160), muxed("m720", 720)];
        let selection = VariantSelector::select(&variants, Format::Mp3).unwrap();
        assert_eq!(selection.variant.format_id, "a160");
        assert_eq!(selection.candidates, 2);
    }

    #[test]
    fn test_mp4_picks_highest_muxed() {
        let variants = vec![audio("a160", 160), muxed("m720", 720), muxed("m360", 360)];
        let selection = VariantSelector::select(&variants, Format::Mp4).unwrap();
        assert_eq!(selection.variant.format_id, "m720");
        assert_eq!(selection.candidates, 2);
    }

    #[test]
    fn test_tie_prefers_first_listed() {
        let variants = vec![audio("first", 128), audio("second", 128)];
        let selection = VariantSelector::select(&variants, Format::Mp3).unwrap();
        assert_eq!(selection.variant.format_id, "first");
    }

    #[test]
    fn test_audio_only_source_has_no_mp4() {
        let variants = vec![audio("a128", 128), audio("a160", 160)];
        let err = VariantSelector::select(&variants, Format::Mp4).unwrap_err();
        assert_eq!(
            err,
            SelectionError::NotFound {
                format: Format::Mp4,
                required: VariantKind::Muxed,
                offered: 2,
            }
        );
        assert!(err.to_string().contains("MP4"));
    }

    #[test]
    fn test_selection_is_deterministic() {
        let variants = vec![
            muxed("m360", 360),
            audio("a128", 128),
            muxed("m720a", 720),
            muxed("m720b", 720),
        ];
        let first = VariantSelector::select(&variants, Format::Mp4).unwrap();
        let second = VariantSelector::select(&variants, Format::Mp4).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.variant.format_id, "m720a");
    }

    #[test]
    fn test_empty_variants() {
        let err = VariantSelector::select(&[], Format::Mp3).unwrap_err();
        let converted: DownloadError = err.into();
        assert_eq!(converted, DownloadError::no_variant(Format::Mp3));
    }
}
