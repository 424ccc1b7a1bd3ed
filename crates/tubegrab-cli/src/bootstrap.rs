//! CLI bootstrap - the composition root.
//!
//! Settings are loaded for every command. The external tool adapters are
//! only discovered by commands that need them, so `config` and `paths` work
//! on machines without yt-dlp or ffmpeg.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tubegrab_core::{Settings, load_settings, settings_file_path};
use tubegrab_runtime::{FfmpegConfig, FfmpegTranscoder, Tool, YtDlpSource, locate};

use crate::error::CliError;

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Settings file override from `--config`.
    pub config_path: Option<PathBuf>,
}

/// Loaded settings and where they live.
#[derive(Debug, Clone)]
pub struct CliContext {
    /// Path the settings were read from and are saved to.
    pub settings_path: PathBuf,
    /// Current settings.
    pub settings: Settings,
}

impl CliContext {
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }
}

/// Resolve the settings file and load it.
pub fn bootstrap(config: CliConfig) -> Result<CliContext, CliError> {
    let settings_path = settings_file_path(config.config_path.as_deref())?;
    let settings = load_settings(&settings_path);
    tracing::debug!(path = %settings_path.display(), "Loaded settings");
    Ok(CliContext {
        settings_path,
        settings,
    })
}

/// Concrete port implementations for a download.
pub struct Adapters {
    pub source: Arc<YtDlpSource>,
    pub transcoder: Arc<FfmpegTranscoder>,
}

/// Options applied when wiring adapters.
#[derive(Debug, Clone, Default)]
pub struct AdapterOptions {
    /// Extra arguments for every yt-dlp call.
    pub ytdlp_args: Vec<String>,
    /// Per-conversion ffmpeg deadline.
    pub transcode_timeout: Option<Duration>,
}

impl Adapters {
    /// Locate both executables and build the adapters.
    pub fn discover(options: AdapterOptions) -> Result<Self, CliError> {
        let source = YtDlpSource::new(locate(Tool::YtDlp)?).with_extra_args(options.ytdlp_args);

        let mut ffmpeg = FfmpegConfig::new(locate(Tool::Ffmpeg)?);
        if let Some(limit) = options.transcode_timeout {
            ffmpeg = ffmpeg.with_timeout(limit);
        }

        tracing::debug!(
            ytdlp = %source.binary().display(),
            ffmpeg = %ffmpeg.binary.display(),
            "Discovered external tools"
        );

        Ok(Self {
            source: Arc::new(source),
            transcoder: Arc::new(FfmpegTranscoder::new(ffmpeg)),
        })
    }
}
