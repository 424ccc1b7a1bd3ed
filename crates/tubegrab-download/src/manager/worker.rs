//! Item processing pipeline.
//!
//! Runs one job from variant lookup to finished file, isolated from the
//! pool that schedules it. The worker operates on a value-type `Job` and
//! cloned Arc dependencies.
//!
//! # Design Principles
//!
//! - Every failure is converted into an `ItemOutcome` here; nothing escapes
//! - Phase events for one job are emitted in order:
//!   `Downloading` → `Converting` → `Complete` | `Failed`
//! - Cancellation is honored before the job starts and during the fetch

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use tubegrab_core::download::{
    AudioParams, DownloadError, Format, ItemOutcome, JobId, MediaItem, Phase, StatusEvent,
};
use tubegrab_core::ports::{MediaSource, ProgressSink, Transcoder};

use super::paths::JobPaths;
use crate::progress::ProgressThrottle;
use crate::variant_selector::VariantSelector;

const LOG_TARGET: &str = "tubegrab.download";

/// Dependencies for the item worker.
///
/// Cloned Arc references to the ports, so a worker never touches the
/// orchestrator's state.
#[derive(Clone)]
pub struct WorkerDeps {
    /// Metadata and stream source.
    pub source: Arc<dyn MediaSource>,
    /// Audio converter used for MP3 jobs.
    pub transcoder: Arc<dyn Transcoder>,
    /// Where status lines go.
    pub sink: Arc<dyn ProgressSink>,
    /// Transcoder parameters for MP3 output.
    pub audio: AudioParams,
}

/// A unit of work: one item, one target format.
///
/// Created per enumerated item and consumed by exactly one worker.
#[derive(Debug, Clone)]
pub struct Job {
    /// Position-based identity within the batch.
    pub id: JobId,
    /// The item to fetch.
    pub item: MediaItem,
    /// Target output type.
    pub format: Format,
    /// Directory receiving output files.
    pub output_dir: PathBuf,
}

impl Job {
    /// Create a job for the item at 1-based `position`.
    pub fn new(position: u32, item: MediaItem, format: Format, output_dir: &Path) -> Self {
        Self {
            id: JobId::new(position, item.id.clone()),
            item,
            format,
            output_dir: output_dir.to_path_buf(),
        }
    }
}

/// Status emitter bound to one job.
struct JobReporter<'a> {
    id: &'a JobId,
    sink: &'a dyn ProgressSink,
}

impl JobReporter<'_> {
    fn emit(&self, phase: Phase, message: impl Into<String>) {
        tracing::trace!(target: LOG_TARGET, job = %self.id, phase = phase.as_str(), "Status");
        self.sink
            .on_status(&StatusEvent::job(self.id.clone(), phase, message));
    }

    fn fail(&self, error: DownloadError) -> ItemOutcome {
        tracing::warn!(target: LOG_TARGET, job = %self.id, error = %error, "Job failed");
        self.emit(Phase::Failed, error.user_message());
        ItemOutcome::Error { error }
    }
}

/// Run a job to a terminal outcome.
///
/// Never returns an error: resolution, selection, transfer and I/O failures
/// are reported as `Failed` status events and folded into the outcome.
pub async fn process_job(
    job: Job,
    deps: &WorkerDeps,
    cancel: &CancellationToken,
) -> ItemOutcome {
    if cancel.is_cancelled() {
        tracing::debug!(target: LOG_TARGET, job = %job.id, "Skipping job, batch cancelled");
        return ItemOutcome::Cancelled;
    }

    let reporter = JobReporter {
        id: &job.id,
        sink: deps.sink.as_ref(),
    };

    // Step 1: Look up what streams exist
    let variants = match deps.source.resolve_variants(&job.item.id).await {
        Ok(variants) => variants,
        Err(e) => return reporter.fail(e),
    };

    // Step 2: Choose one
    let variant = match VariantSelector::select(&variants, job.format) {
        Ok(selection) => selection.variant,
        Err(e) => {
            tracing::info!(target: LOG_TARGET, job = %job.id, reason = %e, "Skipping item");
            let reason = DownloadError::from(e).user_message();
            reporter.emit(Phase::Failed, reason.clone());
            return ItemOutcome::Skipped { reason };
        }
    };

    // Step 3: Plan files
    let paths = JobPaths::plan(&job.output_dir, &job.item.title, job.format);
    if let Err(e) = paths.ensure_dir() {
        return reporter.fail(e);
    }
    for path in paths.existing() {
        tracing::warn!(
            target: LOG_TARGET,
            job = %job.id,
            path = %path.display(),
            "Output file exists and will be overwritten"
        );
    }

    // Step 4: Fetch the stream
    reporter.emit(Phase::Downloading, format!("Downloading: {}", job.item.title));
    tracing::debug!(
        target: LOG_TARGET,
        job = %job.id,
        format_id = %variant.format_id,
        dest = %paths.download_target().display(),
        "Fetching stream"
    );

    let fetched = tokio::select! {
        biased;

        () = cancel.cancelled() => Err(DownloadError::Cancelled),

        result = deps.source.fetch_stream(&job.item.id, &variant, paths.download_target()) => {
            result
        }
    };
    if let Err(e) = fetched {
        remove_partial(paths.download_target(), &job.id).await;
        if e.is_cancelled() {
            tracing::info!(
                target: LOG_TARGET,
                job = %job.id,
                "Download interrupted by cancellation"
            );
            reporter.emit(Phase::Failed, e.user_message());
            return ItemOutcome::Cancelled;
        }
        return reporter.fail(e);
    }

    // Step 5: Transcode if needed
    if let Some(temp_path) = &paths.temp_path {
        reporter.emit(Phase::Converting, format!("Converting: {}", job.item.title));

        let throttle = ProgressThrottle::default_interval();
        let on_line = |line: &str| {
            if throttle.should_emit() {
                reporter.emit(Phase::Converting, line);
            }
        };

        if let Err(e) = deps
            .transcoder
            .convert(temp_path, &paths.final_path, &deps.audio, &on_line)
            .await
        {
            tracing::warn!(
                target: LOG_TARGET,
                job = %job.id,
                temp = %temp_path.display(),
                "Keeping intermediate file after failed conversion"
            );
            return reporter.fail(e);
        }

        if let Err(e) = tokio::fs::remove_file(temp_path).await {
            tracing::warn!(
                target: LOG_TARGET,
                job = %job.id,
                temp = %temp_path.display(),
                error = %e,
                "Failed to remove intermediate file"
            );
        }
    }

    // Step 6: Done
    reporter.emit(
        Phase::Complete,
        format!("Download complete: {}", paths.final_path.display()),
    );
    tracing::info!(
        target: LOG_TARGET,
        job = %job.id,
        path = %paths.final_path.display(),
        "Job complete"
    );

    ItemOutcome::Success {
        path: paths.final_path,
    }
}

/// Remove whatever a failed fetch left behind.
async fn remove_partial(path: &Path, id: &JobId) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {
            tracing::debug!(
                target: LOG_TARGET,
                job = %id,
                path = %path.display(),
                "Removed partial download"
            );
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            tracing::warn!(
                target: LOG_TARGET,
                job = %id,
                path = %path.display(),
                error = %e,
                "Failed to remove partial download"
            );
        }
    }
}
