//! Item and variant fixtures.

use tokio::sync::mpsc::UnboundedReceiver;
use tubegrab_core::download::{
    BatchEvent, MediaItem, Phase, ProgressUpdate, StreamVariant, VariantKind,
};

pub const VIDEO_URL: &str = "https://www.youtube.com/watch?v=abc123";
pub const PLAYLIST_URL: &str = "https://www.youtube.com/playlist?list=PL123";

pub fn item(n: usize) -> MediaItem {
    MediaItem::new(format!("vid{n}"), format!("Track {n}"))
}

pub fn audio_variant() -> StreamVariant {
    StreamVariant::new("251", VariantKind::AudioOnly, 160, "webm")
}

pub fn muxed_variant() -> StreamVariant {
    StreamVariant::new("18", VariantKind::Muxed, 360, "mp4")
}

/// Everything the sink received, in order.
pub fn drain(rx: &mut UnboundedReceiver<BatchEvent>) -> Vec<BatchEvent> {
    std::iter::from_fn(|| rx.try_recv().ok()).collect()
}

pub fn progress(events: &[BatchEvent]) -> Vec<ProgressUpdate> {
    events
        .iter()
        .filter_map(|e| match e {
            BatchEvent::Progress { update } => Some(*update),
            _ => None,
        })
        .collect()
}

/// Phases reported for the job at `position`.
pub fn job_phases(events: &[BatchEvent], position: u32) -> Vec<Phase> {
    events
        .iter()
        .filter_map(|e| match e {
            BatchEvent::Status { event } => event
                .job_id
                .as_ref()
                .filter(|id| id.position() == position)
                .map(|_| event.phase),
            _ => None,
        })
        .collect()
}
