//! Download command handler.
//!
//! Wires the adapters and a terminal sink into an orchestrator, runs one
//! batch, and turns Ctrl+C into batch cancellation.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tubegrab_core::{DownloadRequest, Format, MAX_CONCURRENCY, MIN_CONCURRENCY, Settings};
use tubegrab_download::{OrchestratorDeps, build_orchestrator};

use crate::bootstrap::{AdapterOptions, Adapters, CliContext};
use crate::error::CliError;
use crate::presentation::{TerminalSink, print_summary};

/// Arguments for the download command.
#[derive(Debug, Clone)]
pub struct DownloadArgs {
    pub url: String,
    pub format: Format,
    pub output: Option<PathBuf>,
    pub concurrency: Option<u32>,
    pub transcode_timeout: Option<Duration>,
    pub ytdlp_args: Vec<String>,
}

/// Execute the download command.
pub async fn execute(ctx: &CliContext, args: DownloadArgs) -> Result<(), CliError> {
    let request = build_request(ctx.settings(), &args)?;
    let adapters = Adapters::discover(AdapterOptions {
        ytdlp_args: args.ytdlp_args.clone(),
        transcode_timeout: args.transcode_timeout,
    })?;

    let sink = Arc::new(TerminalSink::new());
    let orchestrator = build_orchestrator(OrchestratorDeps {
        source: adapters.source,
        transcoder: adapters.transcoder,
        sink,
    });

    let cancel = CancellationToken::new();
    let watcher = spawn_interrupt_watcher(cancel.clone());
    let outcome = orchestrator.run(request, cancel).await;
    watcher.abort();

    let result = outcome?;
    print_summary(&result);

    if result.was_cancelled {
        return Err(CliError::Cancelled);
    }
    if result.failed > 0 {
        return Err(CliError::PartialFailure {
            failed: result.failed,
            total: result.total(),
        });
    }
    Ok(())
}

/// Build the batch request from flags, falling back to saved settings.
///
/// A batch never starts without a saved API key.
pub fn build_request(
    settings: &Settings,
    args: &DownloadArgs,
) -> Result<DownloadRequest, CliError> {
    if args.url.trim().is_empty() {
        return Err(CliError::Arguments("URL cannot be empty".to_string()));
    }
    if let Some(limit) = args.concurrency
        && !(MIN_CONCURRENCY..=MAX_CONCURRENCY).contains(&limit)
    {
        return Err(CliError::Arguments(format!(
            "--concurrency must be between {MIN_CONCURRENCY} and {MAX_CONCURRENCY}, got {limit}"
        )));
    }

    let (output_dir, saved_limit) = settings.batch_defaults(args.output.clone(), true)?;
    let limit = args.concurrency.unwrap_or(saved_limit);

    Ok(DownloadRequest::new(args.url.trim(), args.format, output_dir).with_concurrency(limit))
}

/// Cancel `token` on the first Ctrl+C.
fn spawn_interrupt_watcher(token: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, cancelling batch");
            eprintln!("\nCancelling... running jobs will stop shortly");
            token.cancel();
        }
    })
}
