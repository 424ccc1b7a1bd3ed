//! Check-deps command handler.

use tubegrab_runtime::{ToolStatus, check_tools};

use crate::error::CliError;
use crate::presentation::{BOLD, GREEN, RED, RESET};

/// Check that every external tool is installed and runnable.
pub async fn execute() -> Result<(), CliError> {
    let statuses = check_tools().await;

    println!("{BOLD}External tools:{RESET}");
    println!("{}", "-".repeat(40));
    for status in &statuses {
        println!("{}", render_row(status));
    }

    let missing: Vec<&str> = statuses
        .iter()
        .filter(|s| !s.is_ok())
        .map(|s| s.tool.binary_name())
        .collect();
    if missing.is_empty() {
        println!("\n{GREEN}All tools available{RESET}");
        Ok(())
    } else {
        Err(CliError::Dependency(format!(
            "Missing or broken: {}",
            missing.join(", ")
        )))
    }
}

fn render_row(status: &ToolStatus) -> String {
    let state = match (&status.version, &status.problem) {
        (Some(version), _) => format!("{GREEN}✓ {version}{RESET}"),
        (None, Some(problem)) => format!("{RED}✗ {problem}{RESET}"),
        (None, None) => format!("{RED}✗ unavailable{RESET}"),
    };
    format!("  {:<8} {state}", status.tool.binary_name())
}
