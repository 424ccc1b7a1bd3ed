//! Main commands enum.

use std::path::PathBuf;

use clap::Subcommand;
use tubegrab_core::Format;

use crate::config_commands::ConfigCommand;

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Download a video or every video in a playlist
    Download {
        /// Video or playlist URL
        url: String,
        /// Output format: mp3 (audio only) or mp4
        #[arg(short, long, default_value = "mp3")]
        format: Format,
        /// Output directory (defaults to the saved path)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Jobs to run at once, 1-10 (defaults to the saved limit)
        #[arg(short = 'j', long)]
        concurrency: Option<u32>,
        /// Abort a single MP3 conversion after this many seconds
        #[arg(long, value_name = "SECS")]
        transcode_timeout: Option<u64>,
        /// Extra argument passed to every yt-dlp call (repeatable)
        #[arg(long = "ytdlp-arg", value_name = "ARG", allow_hyphen_values = true)]
        ytdlp_args: Vec<String>,
    },

    /// View or change saved settings
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Check that yt-dlp and ffmpeg are installed
    CheckDeps,

    /// Show resolved paths for settings and tools
    Paths,
}
