//! `MediaSource` backed by the `yt-dlp` executable.
//!
//! - `resolve_item` / `resolve_variants` run `--dump-json` on one video
//! - `resolve_playlist` streams `--flat-playlist --dump-json` line by line,
//!   so items are yielded while yt-dlp is still paging through the list
//! - `fetch_stream` downloads one format id straight to the destination

mod parse;

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use futures_util::StreamExt;
use futures_util::stream;
use tokio::io::{AsyncBufReadExt, BufReader, Lines};
use tokio::process::{Child, ChildStdout, Command};
use tokio::task::JoinHandle;

use tubegrab_core::download::{DownloadError, MediaItem, StreamVariant};
use tubegrab_core::ports::{MediaItemStream, MediaSource};

use crate::binaries::{Tool, locate};
use crate::error::{BinaryError, YtDlpError};
use crate::process::{collect_stream, failure_reason};

pub use parse::{FlatEntry, FormatEntry, VideoInfo};

const WATCH_URL: &str = "https://www.youtube.com/watch?v=";

/// Media source that shells out to `yt-dlp`.
#[derive(Debug, Clone)]
pub struct YtDlpSource {
    binary: PathBuf,
    extra_args: Vec<String>,
}

impl YtDlpSource {
    /// Use the executable at `binary`.
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            extra_args: Vec::new(),
        }
    }

    /// Locate `yt-dlp` via `TUBEGRAB_YTDLP` or `PATH`.
    pub fn discover() -> Result<Self, BinaryError> {
        locate(Tool::YtDlp).map(Self::new)
    }

    /// Pass additional arguments (cookies, proxy, rate limit) on every call.
    #[must_use]
    pub fn with_extra_args(mut self, args: impl IntoIterator<Item = String>) -> Self {
        self.extra_args.extend(args);
        self
    }

    /// Path of the executable in use.
    pub fn binary(&self) -> &Path {
        &self.binary
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.arg("--no-warnings")
            .args(&self.extra_args)
            .stdin(Stdio::null())
            .kill_on_drop(true);
        cmd
    }

    /// Run `--dump-json` on a single video.
    async fn video_info(&self, url: &str) -> Result<VideoInfo, YtDlpError> {
        let output = self
            .command()
            .args(["--dump-json", "--no-playlist", url])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(YtDlpError::Spawn)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(YtDlpError::Failed(failure_reason(output.status, &stderr)));
        }

        Ok(serde_json::from_slice(&output.stdout)?)
    }

    fn spawn_playlist(&self, url: &str) -> Result<PlaylistReader, YtDlpError> {
        let mut child = self
            .command()
            .args(["--flat-playlist", "--dump-json", url])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(YtDlpError::Spawn)?;

        let stdout = child.stdout.take().ok_or_else(|| {
            YtDlpError::Io(std::io::Error::other("yt-dlp stdout was not captured"))
        })?;
        let stderr = child.stderr.take().map(collect_stream);

        Ok(PlaylistReader {
            lines: BufReader::new(stdout).lines(),
            child,
            stderr,
        })
    }
}

/// Running `--flat-playlist` process, read one entry at a time.
struct PlaylistReader {
    lines: Lines<BufReader<ChildStdout>>,
    child: Child,
    stderr: Option<JoinHandle<String>>,
}

impl PlaylistReader {
    /// Next item, `None` once output ends cleanly.
    async fn next_item(&mut self) -> Option<Result<MediaItem, DownloadError>> {
        loop {
            match self.lines.next_line().await {
                Ok(Some(line)) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    let entry = match serde_json::from_str::<FlatEntry>(&line) {
                        Ok(entry) => entry,
                        Err(e) => return Some(Err(YtDlpError::from(e).into_resolution())),
                    };
                    match entry.into_item() {
                        Some(item) => return Some(Ok(item)),
                        None => {
                            tracing::debug!("Skipping playlist entry without id");
                        }
                    }
                }
                Ok(None) => return self.finish().await.err().map(Err),
                Err(e) => return Some(Err(YtDlpError::Io(e).into_resolution())),
            }
        }
    }

    /// Reap the process and surface a failed exit.
    async fn finish(&mut self) -> Result<(), DownloadError> {
        let status = self
            .child
            .wait()
            .await
            .map_err(|e| YtDlpError::Io(e).into_resolution())?;
        let stderr = match self.stderr.take() {
            Some(task) => task.await.unwrap_or_default(),
            None => String::new(),
        };
        if status.success() {
            Ok(())
        } else {
            Err(YtDlpError::Failed(failure_reason(status, &stderr)).into_resolution())
        }
    }
}

#[async_trait]
impl MediaSource for YtDlpSource {
    async fn resolve_item(&self, url: &str) -> Result<MediaItem, DownloadError> {
        let info = self
            .video_info(url)
            .await
            .map_err(YtDlpError::into_resolution)?;
        Ok(info.to_item())
    }

    async fn resolve_playlist(&self, url: &str) -> Result<MediaItemStream, DownloadError> {
        let reader = self
            .spawn_playlist(url)
            .map_err(YtDlpError::into_resolution)?;

        let items = stream::unfold(Some(reader), |state| async move {
            let mut reader = state?;
            match reader.next_item().await {
                Some(Ok(item)) => Some((Ok(item), Some(reader))),
                Some(Err(e)) => Some((Err(e), None)),
                None => None,
            }
        });
        Ok(items.boxed())
    }

    async fn resolve_variants(&self, item_id: &str) -> Result<Vec<StreamVariant>, DownloadError> {
        let url = format!("{WATCH_URL}{item_id}");
        let info = self
            .video_info(&url)
            .await
            .map_err(YtDlpError::into_resolution)?;
        Ok(info.variants())
    }

    async fn fetch_stream(
        &self,
        item_id: &str,
        variant: &StreamVariant,
        dest: &Path,
    ) -> Result<(), DownloadError> {
        let url = format!("{WATCH_URL}{item_id}");
        let output = self
            .command()
            .args(["--no-playlist", "--no-part", "--force-overwrites", "--quiet"])
            .arg("-f")
            .arg(&variant.format_id)
            .arg("-o")
            .arg(output_template(dest))
            .arg(&url)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| YtDlpError::Spawn(e).into_download())?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(YtDlpError::Failed(failure_reason(output.status, &stderr)).into_download());
        }
        if !dest.exists() {
            return Err(YtDlpError::MissingOutput(dest.to_path_buf()).into_download());
        }
        Ok(())
    }
}

/// yt-dlp treats `-o` as a template; escape `%` so the path is literal.
fn output_template(dest: &Path) -> String {
    dest.to_string_lossy().replace('%', "%%")
}
