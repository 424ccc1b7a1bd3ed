//! Subprocess output helpers.
//!
//! External tools can emit non-UTF8 bytes; lines are read as bytes and
//! decoded lossily so a stray byte never ends the reader.

use std::process::ExitStatus;

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};
use tokio::task::JoinHandle;

/// Maximum stderr lines kept for error messages.
const STDERR_TAIL_LINES: usize = 5;

/// Read one line, without its terminator. `Ok(None)` at EOF.
pub async fn read_line_lossy<R>(
    reader: &mut BufReader<R>,
    buf: &mut Vec<u8>,
) -> std::io::Result<Option<String>>
where
    R: AsyncRead + Unpin,
{
    buf.clear();
    if reader.read_until(b'\n', buf).await? == 0 {
        return Ok(None);
    }
    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }
    Ok(Some(String::from_utf8_lossy(buf).into_owned()))
}

/// Drain a stream in the background, returning its contents as text.
pub fn collect_stream<R>(stream: R) -> JoinHandle<String>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut reader = BufReader::new(stream);
        let mut buf = Vec::new();
        let _ = reader.read_to_end(&mut buf).await;
        String::from_utf8_lossy(&buf).into_owned()
    })
}

/// Human-readable reason for a failed exit, preferring the stderr tail.
pub fn failure_reason(status: ExitStatus, stderr: &str) -> String {
    let lines: Vec<&str> = stderr
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    if lines.is_empty() {
        return format!("exited with {status}");
    }
    lines[lines.len().saturating_sub(STDERR_TAIL_LINES)..].join("\n")
}
