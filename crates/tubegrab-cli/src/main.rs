//! CLI entry point.
//!
//! Parses arguments, installs logging, loads settings and dispatches to a
//! handler. Errors map to process exit codes via `CliError`.

use std::process::ExitCode;
use std::time::Duration;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use tubegrab_cli::handlers::download::DownloadArgs;
use tubegrab_cli::{Cli, CliConfig, CliError, Commands, bootstrap, handlers};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            let code = e.downcast_ref::<CliError>().map_or(1, CliError::exit_code);
            ExitCode::from(code)
        }
    }
}

/// `--verbose` forces debug; otherwise `RUST_LOG`, defaulting to warn.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let ctx = bootstrap(CliConfig {
        config_path: cli.config,
    })?;

    match command {
        Commands::Download {
            url,
            format,
            output,
            concurrency,
            transcode_timeout,
            ytdlp_args,
        } => {
            let args = DownloadArgs {
                url,
                format,
                output,
                concurrency,
                transcode_timeout: transcode_timeout.map(Duration::from_secs),
                ytdlp_args,
            };
            handlers::download::execute(&ctx, args).await?;
        }
        Commands::Config { command } => {
            handlers::config::execute(&ctx, command)?;
        }
        Commands::CheckDeps => {
            handlers::check_deps::execute().await?;
        }
        Commands::Paths => {
            handlers::paths::execute(&ctx)?;
        }
    }

    Ok(())
}
