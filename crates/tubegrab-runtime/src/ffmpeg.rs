//! `Transcoder` backed by the `ffmpeg` executable.
//!
//! Progress is requested on stdout (`-progress pipe:1`) and forwarded line
//! by line; stderr is only kept for the failure message.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::BufReader;
use tokio::process::Command;

use tubegrab_core::download::{AudioParams, DownloadError};
use tubegrab_core::ports::{LineCallback, Transcoder};

use crate::binaries::{Tool, locate};
use crate::error::{BinaryError, FfmpegError};
use crate::process::{collect_stream, failure_reason, read_line_lossy};

/// How to run ffmpeg.
#[derive(Debug, Clone)]
pub struct FfmpegConfig {
    /// Executable path.
    pub binary: PathBuf,
    /// Kill the conversion after this long. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl FfmpegConfig {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            timeout: None,
        }
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Transcoder that shells out to `ffmpeg`.
#[derive(Debug, Clone)]
pub struct FfmpegTranscoder {
    config: FfmpegConfig,
}

impl FfmpegTranscoder {
    pub const fn new(config: FfmpegConfig) -> Self {
        Self { config }
    }

    /// Locate `ffmpeg` via `TUBEGRAB_FFMPEG` or `PATH`.
    pub fn discover() -> Result<Self, BinaryError> {
        locate(Tool::Ffmpeg).map(|binary| Self::new(FfmpegConfig::new(binary)))
    }

    pub const fn config(&self) -> &FfmpegConfig {
        &self.config
    }

    async fn run(
        &self,
        input: &Path,
        output: &Path,
        params: &AudioParams,
        on_line: LineCallback<'_>,
    ) -> Result<(), FfmpegError> {
        let mut child = Command::new(&self.config.binary)
            .args(build_args(input, output, params))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(FfmpegError::Spawn)?;

        let stderr = child.stderr.take().map(collect_stream);
        let stdout = child.stdout.take();

        let conversion = async {
            if let Some(stdout) = stdout {
                let mut reader = BufReader::new(stdout);
                let mut buf = Vec::new();
                while let Some(line) = read_line_lossy(&mut reader, &mut buf)
                    .await
                    .map_err(FfmpegError::Io)?
                {
                    if !line.is_empty() {
                        on_line(&line);
                    }
                }
            }
            child.wait().await.map_err(FfmpegError::Io)
        };

        let status = match self.config.timeout {
            Some(limit) => {
                let outcome = tokio::time::timeout(limit, conversion).await;
                if let Ok(status) = outcome {
                    status?
                } else {
                    if let Err(e) = child.kill().await {
                        tracing::warn!(error = %e, "Failed to kill timed-out ffmpeg");
                    }
                    return Err(FfmpegError::TimedOut(limit));
                }
            }
            None => conversion.await?,
        };

        if status.success() {
            return Ok(());
        }
        let stderr = match stderr {
            Some(task) => task.await.unwrap_or_default(),
            None => String::new(),
        };
        Err(FfmpegError::Failed(failure_reason(status, &stderr)))
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    async fn convert(
        &self,
        input: &Path,
        output: &Path,
        params: &AudioParams,
        on_line: LineCallback<'_>,
    ) -> Result<(), DownloadError> {
        tracing::debug!(
            input = %input.display(),
            output = %output.display(),
            bitrate_kbps = params.bitrate_kbps,
            "Starting ffmpeg conversion"
        );
        self.run(input, output, params, on_line)
            .await
            .map_err(DownloadError::from)
    }
}

/// Arguments for an audio-only conversion of `input` into `output`.
fn build_args(input: &Path, output: &Path, params: &AudioParams) -> Vec<String> {
    vec![
        "-y".into(),
        "-hide_banner".into(),
        "-nostats".into(),
        "-progress".into(),
        "pipe:1".into(),
        "-i".into(),
        input.to_string_lossy().into_owned(),
        "-vn".into(),
        "-ar".into(),
        params.sample_rate.to_string(),
        "-ac".into(),
        params.channels.to_string(),
        "-b:a".into(),
        format!("{}k", params.bitrate_kbps),
        "-threads".into(),
        params.thread_hint.to_string(),
        output.to_string_lossy().into_owned(),
    ]
}


#[cfg(all(test, unix))]
mod process_tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::sync::Mutex;

    fn fake_binary(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("ffmpeg");
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    fn params() -> AudioParams {
        AudioParams {
            sample_rate: 44_100,
            channels: 2,
            bitrate_kbps: 192,
            thread_hint: 1,
        }
    }

    #[tokio::test]
    async fn forwards_progress_lines() {
        let dir = tempfile::tempdir().unwrap();
        let binary = fake_binary(
            dir.path(),
            r#"echo 'out_time=00:00:01.000000'
echo 'progress=continue'
echo 'progress=end'
for last; do :; done
: > "$last""#,
        );
        let transcoder = FfmpegTranscoder::new(FfmpegConfig::new(binary));
        let output = dir.path().join("a.mp3");
        let lines = Mutex::new(Vec::new());
        let on_line = |line: &str| lines.lock().unwrap().push(line.to_string());

        tokio_test::assert_ok!(
            transcoder
                .convert(&dir.path().join("a.mp4"), &output, &params(), &on_line)
                .await
        );

        assert!(output.exists());
        assert_eq!(
            lines.into_inner().unwrap(),
            vec!["out_time=00:00:01.000000", "progress=continue", "progress=end"]
        );
    }

    #[tokio::test]
    async fn failure_reports_stderr_tail() {
        let dir = tempfile::tempdir().unwrap();
        let binary = fake_binary(
            dir.path(),
            "echo 'a.mp4: Invalid data found when processing input' >&2\nexit 1",
        );
        let transcoder = FfmpegTranscoder::new(FfmpegConfig::new(binary));

        let err = transcoder
            .convert(
                &dir.path().join("a.mp4"),
                &dir.path().join("a.mp3"),
                &params(),
                &|_| {},
            )
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Invalid data found"));
    }

    #[tokio::test]
    async fn slow_conversion_times_out() {
        let dir = tempfile::tempdir().unwrap();
        let binary = fake_binary(dir.path(), "exec sleep 5");
        let transcoder = FfmpegTranscoder::new(
            FfmpegConfig::new(binary).with_timeout(Duration::from_millis(100)),
        );

        let err = transcoder
            .run(
                &dir.path().join("a.mp4"),
                &dir.path().join("a.mp3"),
                &params(),
                &|_| {},
            )
            .await
            .unwrap_err();

        assert!(matches!(err, FfmpegError::TimedOut(_)));
    }
}
