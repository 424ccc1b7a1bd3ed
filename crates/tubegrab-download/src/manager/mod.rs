//! Batch orchestrator.
//!
//! Turns one `DownloadRequest` into a finished `BatchResult`: classifies the
//! URL, enumerates items, fans jobs out to a fixed pool of workers and folds
//! their outcomes back together.
//!
//! # Concurrency Model
//!
//! - A producer (the calling task) feeds jobs into a bounded channel
//! - `concurrency_limit` worker tasks pull from the shared receiver, so at
//!   most that many jobs run at once
//! - The completion counter is the only state workers share; increment and
//!   emission happen under one lock
//! - Cancellation is checked before each dispatch and before each job starts

mod paths;
mod worker;

use std::sync::Arc;

use futures_util::StreamExt;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use tubegrab_core::download::{
    AudioParams, BatchResult, DownloadError, DownloadRequest, ItemOutcome, JobId, MediaItem,
    Phase, StatusEvent,
};
use tubegrab_core::ports::{MediaSource, ProgressSink, Transcoder};

use crate::progress::ProgressCounter;

pub use paths::JobPaths;
pub use worker::{Job, WorkerDeps, process_job};

const LOG_TARGET: &str = "tubegrab.download";

/// Item id used for playlist slots whose entry could not be read.
const UNRESOLVED_ITEM: &str = "unresolved";

/// Outcome of one slot in the batch.
type SlotOutcome = (JobId, ItemOutcome);

/// What enumeration found.
enum Enumeration {
    /// A single video.
    Single(MediaItem),
    /// A playlist with `total` items counted in the first pass.
    Playlist { total: u32 },
}

impl Enumeration {
    const fn total(&self) -> u32 {
        match self {
            Self::Single(_) => 1,
            Self::Playlist { total } => *total,
        }
    }
}

/// Dependencies for building an orchestrator.
pub struct OrchestratorDeps<S, T, P> {
    /// Metadata and stream source.
    pub source: Arc<S>,
    /// Audio converter for MP3 jobs.
    pub transcoder: Arc<T>,
    /// Caller-owned status/progress surface.
    pub sink: Arc<P>,
}

/// Build an orchestrator with default MP3 audio parameters.
pub fn build_orchestrator<S, T, P>(deps: OrchestratorDeps<S, T, P>) -> DownloadOrchestrator
where
    S: MediaSource + 'static,
    T: Transcoder + 'static,
    P: ProgressSink + 'static,
{
    DownloadOrchestrator::new(WorkerDeps {
        source: deps.source,
        transcoder: deps.transcoder,
        sink: deps.sink,
        audio: AudioParams::mp3_default(),
    })
}

/// Fan-out/fan-in coordinator for one batch at a time.
///
/// Stateless between runs: each call to [`DownloadOrchestrator::run`] starts
/// a fresh `Enumerating → Running → Finished` sequence.
#[derive(Clone)]
pub struct DownloadOrchestrator {
    deps: WorkerDeps,
}

impl DownloadOrchestrator {
    /// Create an orchestrator from worker dependencies.
    pub const fn new(deps: WorkerDeps) -> Self {
        Self { deps }
    }

    /// Run a batch to completion.
    ///
    /// Returns `Err` only for batch-level failures (invalid request, root URL
    /// that cannot be resolved, cancellation before dispatch begins). Those are
    /// reported once to the sink and no `ProgressUpdate` is emitted. Per-item
    /// failures are folded into the returned `BatchResult`.
    pub async fn run(
        &self,
        request: DownloadRequest,
        cancel: CancellationToken,
    ) -> Result<BatchResult, DownloadError> {
        let run_id = uuid::Uuid::new_v4();
        tracing::info!(
            target: LOG_TARGET,
            run = %run_id,
            url = %request.url,
            format = %request.format,
            concurrency = request.concurrency_limit,
            "Batch STARTED"
        );

        let enumeration = match self.enumerate(&request, &cancel).await {
            Ok(enumeration) => enumeration,
            Err(e) => {
                tracing::warn!(target: LOG_TARGET, run = %run_id, error = %e, "Batch aborted");
                self.deps
                    .sink
                    .on_status(&StatusEvent::batch(Phase::Failed, e.user_message()));
                self.deps.sink.on_batch_failed(&e);
                return Err(e);
            }
        };

        let total = enumeration.total();
        let counter = Arc::new(ProgressCounter::new(total));
        counter.announce(self.deps.sink.as_ref());

        let mut outcomes = self
            .dispatch(&request, enumeration, &counter, &cancel)
            .await;
        outcomes.sort_by_key(|(id, _)| id.position());

        let mut result = BatchResult::new();
        for (id, outcome) in &outcomes {
            result.record(id, outcome);
        }
        result.was_cancelled = cancel.is_cancelled();

        tracing::info!(
            target: LOG_TARGET,
            run = %run_id,
            succeeded = result.succeeded,
            failed = result.failed,
            cancelled = result.cancelled,
            "Batch FINISHED"
        );
        self.deps.sink.on_finished(&result);
        Ok(result)
    }

    /// Classify the URL and count its items.
    async fn enumerate(
        &self,
        request: &DownloadRequest,
        cancel: &CancellationToken,
    ) -> Result<Enumeration, DownloadError> {
        request.validate()?;
        if cancel.is_cancelled() {
            return Err(DownloadError::Cancelled);
        }

        self.deps.sink.on_status(&StatusEvent::batch(
            Phase::Enumerating,
            format!("Resolving {}", request.url),
        ));

        if !request.is_playlist() {
            let item = self.deps.source.resolve_item(&request.url).await?;
            return Ok(Enumeration::Single(item));
        }

        // First pass: count, so progress has a total before work begins
        let mut stream = self.deps.source.resolve_playlist(&request.url).await?;
        let mut total: u32 = 0;
        while let Some(item) = stream.next().await {
            if cancel.is_cancelled() {
                return Err(DownloadError::Cancelled);
            }
            item?;
            total = total.saturating_add(1);
        }

        tracing::debug!(target: LOG_TARGET, url = %request.url, total, "Playlist counted");
        Ok(Enumeration::Playlist { total })
    }

    /// Feed jobs to the worker pool and collect every slot's outcome.
    async fn dispatch(
        &self,
        request: &DownloadRequest,
        enumeration: Enumeration,
        counter: &Arc<ProgressCounter>,
        cancel: &CancellationToken,
    ) -> Vec<SlotOutcome> {
        let total = enumeration.total();
        if total == 0 {
            return Vec::new();
        }

        let worker_count = request.concurrency_limit.clamp(1, total);
        let (tx, rx) = mpsc::channel::<Job>(worker_count as usize);
        let rx = Arc::new(Mutex::new(rx));

        let mut workers = JoinSet::new();
        for _ in 0..worker_count {
            workers.spawn(run_worker(
                Arc::clone(&rx),
                self.deps.clone(),
                Arc::clone(counter),
                cancel.clone(),
            ));
        }
        drop(rx);

        let mut producer = Producer {
            tx,
            sink: self.deps.sink.as_ref(),
            counter,
            cancel,
            request,
            dispatched: 0,
            outcomes: Vec::new(),
            reopen_error: None,
        };

        match enumeration {
            Enumeration::Single(item) => {
                producer.send(item).await;
            }
            Enumeration::Playlist { total } => {
                producer.feed_playlist(self.deps.source.as_ref(), total).await;
            }
        }

        let mut outcomes = producer.finish(total);

        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok(worker_outcomes) => outcomes.extend(worker_outcomes),
                Err(e) => tracing::error!(target: LOG_TARGET, error = %e, "Worker task failed"),
            }
        }

        outcomes
    }
}

/// Dispatch side of a batch.
struct Producer<'a> {
    tx: mpsc::Sender<Job>,
    sink: &'a dyn ProgressSink,
    counter: &'a ProgressCounter,
    cancel: &'a CancellationToken,
    request: &'a DownloadRequest,
    /// Slots handed out so far (dispatched or recorded here).
    dispatched: u32,
    /// Outcomes recorded without a worker.
    outcomes: Vec<SlotOutcome>,
    /// Why the second playlist pass could not start, if it failed.
    reopen_error: Option<DownloadError>,
}

impl Producer<'_> {
    /// Queue `item` for the next free worker. Returns false once dispatch
    /// should stop.
    async fn send(&mut self, item: MediaItem) -> bool {
        if self.cancel.is_cancelled() {
            return false;
        }
        self.dispatched += 1;
        let job = Job::new(
            self.dispatched,
            item,
            self.request.format,
            &self.request.output_dir,
        );
        if let Err(mpsc::error::SendError(job)) = self.tx.send(job).await {
            // Every worker is gone; account for the slot here.
            tracing::error!(target: LOG_TARGET, job = %job.id, "No workers left to take job");
            self.fail_slot(
                job.id,
                DownloadError::resolution("worker pool stopped unexpectedly"),
            );
            return false;
        }
        true
    }

    /// Second pass over the playlist, dispatching up to `total` items.
    async fn feed_playlist(&mut self, source: &dyn MediaSource, total: u32) {
        let mut stream = match source.resolve_playlist(&self.request.url).await {
            Ok(stream) => stream,
            Err(e) => {
                tracing::warn!(target: LOG_TARGET, error = %e, "Playlist could not be reopened");
                self.reopen_error = Some(e);
                return;
            }
        };

        while let Some(item) = stream.next().await {
            if self.cancel.is_cancelled() {
                break;
            }
            if self.dispatched >= total {
                tracing::warn!(
                    target: LOG_TARGET,
                    total,
                    "Playlist grew between passes, ignoring extra items"
                );
                break;
            }
            match item {
                Ok(item) => {
                    if !self.send(item).await {
                        break;
                    }
                }
                Err(e) => {
                    self.dispatched += 1;
                    let id = JobId::new(self.dispatched, UNRESOLVED_ITEM);
                    self.fail_slot(id, e);
                }
            }
        }
    }

    /// Record a failed slot that never reached a worker.
    fn fail_slot(&mut self, id: JobId, error: DownloadError) {
        tracing::warn!(target: LOG_TARGET, job = %id, error = %error, "Playlist entry failed");
        self.sink.on_status(&StatusEvent::job(
            id.clone(),
            Phase::Failed,
            error.user_message(),
        ));
        self.outcomes.push((id, ItemOutcome::Error { error }));
        self.counter.complete_one(self.sink);
    }

    /// Close the queue and account for slots that were never dispatched.
    fn finish(mut self, total: u32) -> Vec<SlotOutcome> {
        drop(self.tx);

        let remaining = self.dispatched + 1..=total;
        if self.cancel.is_cancelled() {
            for position in remaining {
                self.outcomes.push((
                    JobId::new(position, UNRESOLVED_ITEM),
                    ItemOutcome::Cancelled,
                ));
                self.counter.complete_one(self.sink);
            }
        } else {
            if !remaining.is_empty() && self.reopen_error.is_none() {
                tracing::warn!(
                    target: LOG_TARGET,
                    missing = total - self.dispatched,
                    "Playlist shrank between passes"
                );
            }
            let error = self.reopen_error.take().unwrap_or_else(|| {
                DownloadError::resolution("playlist entry disappeared during download")
            });
            for position in remaining {
                let id = JobId::new(position, UNRESOLVED_ITEM);
                self.sink.on_status(&StatusEvent::job(
                    id.clone(),
                    Phase::Failed,
                    error.user_message(),
                ));
                self.outcomes.push((
                    id,
                    ItemOutcome::Error {
                        error: error.clone(),
                    },
                ));
                self.counter.complete_one(self.sink);
            }
        }

        self.outcomes
    }
}

/// One pool worker: pull jobs until the queue closes.
async fn run_worker(
    rx: Arc<Mutex<mpsc::Receiver<Job>>>,
    deps: WorkerDeps,
    counter: Arc<ProgressCounter>,
    cancel: CancellationToken,
) -> Vec<SlotOutcome> {
    let mut outcomes = Vec::new();
    loop {
        let next = rx.lock().await.recv().await;
        let Some(job) = next else {
            break;
        };

        let id = job.id.clone();
        let outcome = process_job(job, &deps, &cancel).await;
        counter.complete_one(deps.sink.as_ref());
        outcomes.push((id, outcome));
    }
    outcomes
}
