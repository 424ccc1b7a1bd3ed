//! External executable discovery.
//!
//! Each tool is looked up from an environment override first, then `PATH`.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use crate::error::BinaryError;

/// An external tool tubegrab shells out to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    /// Metadata and stream fetcher.
    YtDlp,
    /// Audio transcoder.
    Ffmpeg,
}

impl Tool {
    /// All tools, in check order.
    pub const ALL: [Self; 2] = [Self::YtDlp, Self::Ffmpeg];

    /// Executable name on `PATH`.
    pub const fn binary_name(self) -> &'static str {
        match self {
            Self::YtDlp => "yt-dlp",
            Self::Ffmpeg => "ffmpeg",
        }
    }

    /// Environment variable overriding the executable path.
    pub const fn env_var(self) -> &'static str {
        match self {
            Self::YtDlp => "TUBEGRAB_YTDLP",
            Self::Ffmpeg => "TUBEGRAB_FFMPEG",
        }
    }

    /// Argument that prints the tool's version.
    const fn version_arg(self) -> &'static str {
        match self {
            Self::YtDlp => "--version",
            Self::Ffmpeg => "-version",
        }
    }
}

/// Locate `tool`, honoring its environment override.
pub fn locate(tool: Tool) -> Result<PathBuf, BinaryError> {
    if let Some(value) = std::env::var_os(tool.env_var())
        && !value.is_empty()
    {
        let path = PathBuf::from(value);
        if path.exists() {
            return Ok(path);
        }
        return Err(BinaryError::BadOverride {
            env_var: tool.env_var().to_string(),
            path,
        });
    }

    which::which(tool.binary_name()).map_err(|_| BinaryError::NotFound {
        name: tool.binary_name().to_string(),
        env_var: tool.env_var().to_string(),
    })
}

/// Run the tool's version command and return the first output line.
pub async fn probe_version(tool: Tool, path: &Path) -> Option<String> {
    let output = tokio::process::Command::new(path)
        .arg(tool.version_arg())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .output()
        .await
        .ok()?;

    if !output.status.success() {
        return None;
    }
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .map(|line| line.trim().to_string())
}

/// Result of checking one tool.
#[derive(Debug, Clone)]
pub struct ToolStatus {
    pub tool: Tool,
    pub path: Option<PathBuf>,
    pub version: Option<String>,
    pub problem: Option<String>,
}

impl ToolStatus {
    /// Whether the tool was found and answered its version command.
    pub const fn is_ok(&self) -> bool {
        self.path.is_some() && self.version.is_some()
    }
}

/// Check every tool tubegrab needs.
pub async fn check_tools() -> Vec<ToolStatus> {
    let mut statuses = Vec::with_capacity(Tool::ALL.len());
    for tool in Tool::ALL {
        let status = match locate(tool) {
            Ok(path) => {
                let version = probe_version(tool, &path).await;
                let problem = version
                    .is_none()
                    .then(|| format!("{} did not report a version", path.display()));
                ToolStatus {
                    tool,
                    path: Some(path),
                    version,
                    problem,
                }
            }
            Err(e) => ToolStatus {
                tool,
                path: None,
                version: None,
                problem: Some(e.to_string()),
            },
        };
        statuses.push(status);
    }
    statuses
}
