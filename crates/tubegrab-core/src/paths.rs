//! Settings file location and persistence.
//!
//! The settings file lives in the platform config directory unless
//! `TUBEGRAB_CONFIG` points elsewhere. Reading never fails: a missing or
//! unreadable file yields default settings.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::settings::Settings;

/// Environment variable overriding the settings file location.
pub const CONFIG_ENV_VAR: &str = "TUBEGRAB_CONFIG";

const APP_DIR: &str = "tubegrab";
const SETTINGS_FILE: &str = "settings.txt";

/// Errors from path resolution and settings persistence.
#[derive(Debug, Error)]
pub enum PathError {
    /// Could not determine the user's config directory.
    #[error("Cannot determine config directory")]
    NoConfigDir,

    /// A path was expected to be a directory but was not.
    #[error("{0} exists but is not a directory")]
    NotADirectory(PathBuf),

    /// Failed to create a directory.
    #[error("Failed to create directory {path}: {reason}")]
    CreateFailed { path: PathBuf, reason: String },

    /// Failed to write the settings file.
    #[error("Failed to write settings file {path}: {reason}")]
    WriteFailed { path: PathBuf, reason: String },
}

/// Directory holding tubegrab's configuration.
pub fn config_dir() -> Result<PathBuf, PathError> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR))
        .ok_or(PathError::NoConfigDir)
}

/// Resolve the settings file path.
///
/// Precedence: explicit override, then `TUBEGRAB_CONFIG`, then the platform
/// config directory.
pub fn settings_file_path(override_path: Option<&Path>) -> Result<PathBuf, PathError> {
    if let Some(path) = override_path {
        return Ok(path.to_path_buf());
    }
    if let Ok(value) = env::var(CONFIG_ENV_VAR)
        && !value.trim().is_empty()
    {
        return Ok(PathBuf::from(value));
    }
    Ok(config_dir()?.join(SETTINGS_FILE))
}

/// Load settings from `path`, falling back to defaults.
pub fn load_settings(path: &Path) -> Settings {
    match fs::read_to_string(path) {
        Ok(content) => Settings::from_lines(&content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "No settings file, using defaults");
            Settings::with_defaults()
        }
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "Could not read settings, using defaults"
            );
            Settings::with_defaults()
        }
    }
}

/// Write `settings` to `path`, creating the parent directory if needed.
pub fn save_settings(path: &Path, settings: &Settings) -> Result<(), PathError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        ensure_directory(parent)?;
    }
    fs::write(path, settings.to_lines()).map_err(|e| PathError::WriteFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Create `path` as a directory if it does not exist.
pub fn ensure_directory(path: &Path) -> Result<(), PathError> {
    if path.exists() {
        if path.is_dir() {
            return Ok(());
        }
        return Err(PathError::NotADirectory(path.to_path_buf()));
    }
    fs::create_dir_all(path).map_err(|e| PathError::CreateFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Theme;
    use tempfile::tempdir;

    #[test]
    fn explicit_override_wins() {
        let path = settings_file_path(Some(Path::new("/tmp/custom.txt"))).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/custom.txt"));
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let settings = load_settings(&dir.path().join("absent.txt"));
        assert_eq!(settings, Settings::with_defaults());
    }

    #[test]
    fn save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.txt");
        let settings = Settings {
            theme: Theme::Light,
            default_save_path: Some(dir.path().join("music")),
            api_key: Some("k".to_string()),
            concurrency_limit: 4,
        };

        save_settings(&path, &settings).unwrap();
        assert_eq!(load_settings(&path), settings);
    }

    #[test]
    fn directory_as_settings_file_loads_defaults() {
        let dir = tempdir().unwrap();
        assert_eq!(load_settings(dir.path()), Settings::with_defaults());
    }

    #[test]
    fn ensure_directory_rejects_files() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("file");
        fs::write(&file, "x").unwrap();
        assert!(matches!(
            ensure_directory(&file),
            Err(PathError::NotADirectory(_))
        ));
        ensure_directory(&dir.path().join("a/b")).unwrap();
        assert!(dir.path().join("a/b").is_dir());
    }
}
