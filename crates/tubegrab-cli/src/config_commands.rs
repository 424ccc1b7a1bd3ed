//! Configuration management subcommands.

use std::path::PathBuf;

use clap::Subcommand;
use tubegrab_core::Theme;

/// Configuration management commands.
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show all saved settings
    Show,
    /// Set the theme (light or dark)
    SetTheme {
        theme: Theme,
    },
    /// Set the default output directory
    SetPath {
        /// Directory that downloads are saved into
        path: PathBuf,
        /// Fail if the directory does not exist (default creates it)
        #[arg(long)]
        no_create: bool,
    },
    /// Set the API key
    SetApiKey {
        key: String,
    },
    /// Remove the saved API key
    ClearApiKey,
    /// Set how many jobs run at once (1-10)
    SetConcurrency {
        limit: u32,
    },
}
