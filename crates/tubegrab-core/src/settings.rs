//! Settings domain types and validation.
//!
//! The core reads only the save path and concurrency limit; theme and
//! credential are carried so the persisted file round-trips unchanged.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::download::{DownloadError, MAX_CONCURRENCY, MIN_CONCURRENCY};

/// Default worker count when none is configured.
pub const DEFAULT_CONCURRENCY: u32 = 3;

/// UI colour scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Light => "Light",
            Self::Dark => "Dark",
        })
    }
}

impl FromStr for Theme {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            t if t.eq_ignore_ascii_case("light") => Ok(Self::Light),
            t if t.eq_ignore_ascii_case("dark") => Ok(Self::Dark),
            other => Err(SettingsError::InvalidTheme(other.to_string())),
        }
    }
}

/// Application settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// UI theme.
    pub theme: Theme,
    /// Directory downloads go to when none is given.
    pub default_save_path: Option<PathBuf>,
    /// Credential for the media source, if it needs one.
    pub api_key: Option<String>,
    /// Maximum concurrent jobs (1-10).
    pub concurrency_limit: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Settings validation error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("No output directory set. Pass --output or run `tubegrab config set-path <DIR>`")]
    MissingSavePath,

    #[error("No API key set. Run `tubegrab config set-api-key <KEY>`")]
    MissingCredential,

    #[error("Concurrency limit must be between 1 and 10, got {0}")]
    InvalidConcurrency(u32),

    #[error("Unknown theme '{0}' (expected Light or Dark)")]
    InvalidTheme(String),
}

impl From<SettingsError> for DownloadError {
    fn from(err: SettingsError) -> Self {
        Self::config(err.to_string())
    }
}

impl Settings {
    /// Create settings with sensible defaults.
    #[must_use]
    pub const fn with_defaults() -> Self {
        Self {
            theme: Theme::Dark,
            default_save_path: None,
            api_key: None,
            concurrency_limit: DEFAULT_CONCURRENCY,
        }
    }

    /// Parse the four-line settings file: theme, path, credential, concurrency.
    ///
    /// Fewer than three lines yields defaults. The concurrency line is
    /// optional; an unparsable or out-of-range value falls back to the
    /// default. Unknown themes map to Dark.
    #[must_use]
    pub fn from_lines(content: &str) -> Self {
        let lines: Vec<&str> = content.lines().collect();
        if lines.len() < 3 {
            return Self::with_defaults();
        }

        let theme = lines[0].parse().unwrap_or_default();
        let default_save_path = Some(lines[1])
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);
        let api_key = Some(lines[2])
            .filter(|k| !k.trim().is_empty())
            .map(str::to_string);
        let concurrency_limit = lines
            .get(3)
            .and_then(|l| l.trim().parse::<u32>().ok())
            .filter(|n| (MIN_CONCURRENCY..=MAX_CONCURRENCY).contains(n))
            .unwrap_or(DEFAULT_CONCURRENCY);

        Self {
            theme,
            default_save_path,
            api_key,
            concurrency_limit,
        }
    }

    /// Render the four-line settings file.
    #[must_use]
    pub fn to_lines(&self) -> String {
        let path = self
            .default_save_path
            .as_ref()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default();
        format!(
            "{}\n{}\n{}\n{}\n",
            self.theme,
            path,
            self.api_key.as_deref().unwrap_or_default(),
            self.concurrency_limit
        )
    }

    /// Resolve the output directory for a batch, preferring `override_dir`.
    ///
    /// `require_credential` adds the credential check for sources that need
    /// one. Returns the directory and the validated concurrency limit.
    pub fn batch_defaults(
        &self,
        override_dir: Option<PathBuf>,
        require_credential: bool,
    ) -> Result<(PathBuf, u32), SettingsError> {
        let dir = override_dir
            .or_else(|| self.default_save_path.clone())
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or(SettingsError::MissingSavePath)?;

        if require_credential && self.api_key.as_deref().is_none_or(|k| k.trim().is_empty()) {
            return Err(SettingsError::MissingCredential);
        }

        validate_settings(self)?;
        Ok((dir, self.concurrency_limit))
    }
}

/// Validate settings values.
pub fn validate_settings(settings: &Settings) -> Result<(), SettingsError> {
    if !(MIN_CONCURRENCY..=MAX_CONCURRENCY).contains(&settings.concurrency_limit) {
        return Err(SettingsError::InvalidConcurrency(
            settings.concurrency_limit,
        ));
    }
    Ok(())
}
