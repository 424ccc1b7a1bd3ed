//! Paths command handler.
//!
//! Prints every resolved location in `key = value` form for diagnosing
//! configuration issues.

use tubegrab_core::config_dir;
use tubegrab_runtime::{Tool, locate};

use crate::bootstrap::CliContext;
use crate::error::CliError;

/// Execute the paths command.
pub fn execute(ctx: &CliContext) -> Result<(), CliError> {
    for (key, value) in resolve(ctx) {
        println!("{key} = {value}");
    }
    Ok(())
}

fn resolve(ctx: &CliContext) -> Vec<(&'static str, String)> {
    let mut rows = vec![
        (
            "config_dir",
            config_dir().map_or_else(|e| format!("<{e}>"), |p| p.display().to_string()),
        ),
        ("settings_file", ctx.settings_path.display().to_string()),
        (
            "default_save_path",
            ctx.settings()
                .default_save_path
                .as_ref()
                .map_or_else(|| "<not set>".to_string(), |p| p.display().to_string()),
        ),
    ];
    for tool in Tool::ALL {
        let value = locate(tool).map_or_else(|e| format!("<{e}>"), |p| p.display().to_string());
        rows.push((tool.binary_name(), value));
    }
    rows
}
