//! Config command handler.

use tubegrab_core::{Settings, ensure_directory, save_settings, validate_settings};

use crate::bootstrap::CliContext;
use crate::config_commands::ConfigCommand;
use crate::error::CliError;

/// Execute the config command.
pub fn execute(ctx: &CliContext, command: ConfigCommand) -> Result<(), CliError> {
    if matches!(command, ConfigCommand::Show) {
        for line in describe(ctx) {
            println!("{line}");
        }
        return Ok(());
    }

    let updated = apply(ctx.settings().clone(), command)?;
    validate_settings(&updated)?;
    save_settings(&ctx.settings_path, &updated)?;
    println!("✓ Settings saved to {}", ctx.settings_path.display());
    Ok(())
}

/// Apply a mutating config command to `settings`.
pub fn apply(mut settings: Settings, command: ConfigCommand) -> Result<Settings, CliError> {
    match command {
        ConfigCommand::Show => {}
        ConfigCommand::SetTheme { theme } => settings.theme = theme,
        ConfigCommand::SetPath { path, no_create } => {
            if no_create {
                if !path.is_dir() {
                    return Err(CliError::Arguments(format!(
                        "{} is not an existing directory",
                        path.display()
                    )));
                }
            } else {
                ensure_directory(&path)?;
            }
            settings.default_save_path = Some(path);
        }
        ConfigCommand::SetApiKey { key } => {
            let key = key.trim().to_string();
            if key.is_empty() {
                return Err(CliError::Arguments("API key cannot be empty".to_string()));
            }
            settings.api_key = Some(key);
        }
        ConfigCommand::ClearApiKey => settings.api_key = None,
        ConfigCommand::SetConcurrency { limit } => settings.concurrency_limit = limit,
    }
    Ok(settings)
}

fn describe(ctx: &CliContext) -> Vec<String> {
    let settings = ctx.settings();
    vec![
        format!("settings_file = {}", ctx.settings_path.display()),
        format!("theme = {}", settings.theme),
        format!(
            "default_save_path = {}",
            settings
                .default_save_path
                .as_ref()
                .map_or_else(|| "(not set)".to_string(), |p| p.display().to_string())
        ),
        format!("api_key = {}", mask_key(settings.api_key.as_deref())),
        format!("concurrency_limit = {}", settings.concurrency_limit),
    ]
}

/// Show only the last four characters of a credential.
fn mask_key(key: Option<&str>) -> String {
    match key {
        None => "(not set)".to_string(),
        Some(k) => {
            let len = k.chars().count();
            if len <= 4 {
                return "****".to_string();
            }
            let tail: String = k.chars().skip(len - 4).collect();
            format!("****{tail}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tubegrab_core::{Theme, load_settings};

    #[test]
    fn set_commands_update_fields() {
        let settings = apply(
            Settings::with_defaults(),
            ConfigCommand::SetTheme { theme: Theme::Light },
        )
        .unwrap();
        assert_eq!(settings.theme, Theme::Light);

        let settings = apply(settings, ConfigCommand::SetConcurrency { limit: 8 }).unwrap();
        assert_eq!(settings.concurrency_limit, 8);

        let settings = apply(
            settings,
            ConfigCommand::SetApiKey {
                key: " abc123 ".to_string(),
            },
        )
        .unwrap();
        assert_eq!(settings.api_key.as_deref(), Some("abc123"));

        let settings = apply(settings, ConfigCommand::ClearApiKey).unwrap();
        assert!(settings.api_key.is_none());
    }

    #[test]
    fn set_path_creates_directory_unless_told_not_to() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("music");

        let err = apply(
            Settings::with_defaults(),
            ConfigCommand::SetPath {
                path: target.clone(),
                no_create: true,
            },
        )
        .unwrap_err();
        assert!(matches!(err, CliError::Arguments(_)));

        let settings = apply(
            Settings::with_defaults(),
            ConfigCommand::SetPath {
                path: target.clone(),
                no_create: false,
            },
        )
        .unwrap();
        assert!(target.is_dir());
        assert_eq!(settings.default_save_path, Some(target));
    }

    #[test]
    fn execute_rejects_invalid_concurrency_without_saving() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = CliContext {
            settings_path: dir.path().join("settings.txt"),
            settings: Settings::with_defaults(),
        };

        let err = execute(&ctx, ConfigCommand::SetConcurrency { limit: 0 }).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
        assert!(!ctx.settings_path.exists());
    }

    #[test]
    fn execute_persists_changes() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = CliContext {
            settings_path: dir.path().join("nested").join("settings.txt"),
            settings: Settings::with_defaults(),
        };

        execute(&ctx, ConfigCommand::SetPath {
            path: PathBuf::from(dir.path()),
            no_create: true,
        })
        .unwrap();

        let saved = load_settings(&ctx.settings_path);
        assert_eq!(saved.default_save_path.as_deref(), Some(dir.path()));
    }

    #[test]
    fn keys_are_masked() {
        assert_eq!(mask_key(None), "(not set)");
        assert_eq!(mask_key(Some("abc")), "****");
        assert_eq!(mask_key(Some("sk-123456789")), "****6789");
    }
}
