//! Process adapters for tubegrab.
//!
//! Implements the `MediaSource` and `Transcoder` ports by driving the
//! `yt-dlp` and `ffmpeg` executables, and locates those executables.

#![deny(unsafe_code)]

pub mod binaries;
pub mod error;
pub mod ffmpeg;
mod process;
pub mod ytdlp;

pub use binaries::{Tool, ToolStatus, check_tools, locate, probe_version};
pub use error::{BinaryError, FfmpegError, YtDlpError};
pub use ffmpeg::{FfmpegConfig, FfmpegTranscoder};
pub use ytdlp::YtDlpSource;
