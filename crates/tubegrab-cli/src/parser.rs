//! Main CLI parser and top-level argument handling.

use std::path::PathBuf;

use clap::Parser;

use crate::commands::Commands;

/// Download videos and playlists as MP4, or as MP3 audio.
#[derive(Parser)]
#[command(name = "tubegrab")]
#[command(about = "Download videos and playlists as MP4 or MP3")]
#[command(version)]
pub struct Cli {
    /// Read and write settings at this path instead of the default
    #[arg(long = "config", global = true, env = "TUBEGRAB_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}
