//! `ProgressSink` that renders a batch in the terminal.
//!
//! One bar tracks finished jobs. Job status lines print above it; converter
//! progress only updates the bar message so it does not scroll the terminal.
//! When stderr is not a terminal the bar is hidden, and status and progress
//! lines print plainly.

use std::io::{self, IsTerminal};

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tubegrab_core::{BatchResult, DownloadError, Phase, ProgressSink, ProgressUpdate, StatusEvent};

use super::{GREEN, RED, RESET};

const CONVERTING_PREFIX: &str = "Converting:";
const BAR_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:30.cyan/blue}] {pos}/{len} {wide_msg}";

/// Terminal progress display for one batch.
pub struct TerminalSink {
    bar: ProgressBar,
    interactive: bool,
}

impl TerminalSink {
    /// Create a sink, auto-detecting terminal capability.
    pub fn new() -> Self {
        let interactive = io::stderr().is_terminal();
        let target = if interactive {
            ProgressDrawTarget::stderr()
        } else {
            ProgressDrawTarget::hidden()
        };
        let bar = ProgressBar::with_draw_target(None, target);
        bar.set_style(
            ProgressStyle::default_bar()
                .template(BAR_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▓░"),
        );
        Self { bar, interactive }
    }

    fn print_line(&self, line: &str) {
        self.bar.suspend(|| println!("{line}"));
    }
}

impl Default for TerminalSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for TerminalSink {
    fn on_status(&self, event: &StatusEvent) {
        match event.phase {
            Phase::Enumerating => self.bar.set_message(event.message.clone()),
            // Raw converter output is transient.
            Phase::Converting if !event.message.starts_with(CONVERTING_PREFIX) => {
                self.bar.set_message(render_status(event, false));
            }
            _ => self.print_line(&render_status(event, self.interactive)),
        }
    }

    fn on_progress(&self, update: ProgressUpdate) {
        self.bar.set_length(u64::from(update.total));
        self.bar.set_position(u64::from(update.completed));
        if !self.interactive {
            println!("{}", render_progress(update));
        }
    }

    fn on_finished(&self, _result: &BatchResult) {
        self.bar.finish_and_clear();
    }

    fn on_batch_failed(&self, _error: &DownloadError) {
        self.bar.abandon();
    }
}

/// Format a status event as one terminal line.
pub fn render_status(event: &StatusEvent, color: bool) -> String {
    let (mark, tint) = match event.phase {
        Phase::Complete => ("✓", GREEN),
        Phase::Failed => ("✗", RED),
        _ => ("•", ""),
    };
    let prefix = event
        .job_id
        .as_ref()
        .map(|id| format!("[{id}] "))
        .unwrap_or_default();

    if color && !tint.is_empty() {
        format!("{tint}{mark}{RESET} {prefix}{}", event.message)
    } else {
        format!("{mark} {prefix}{}", event.message)
    }
}

/// Format a progress update as one plain line.
pub fn render_progress(update: ProgressUpdate) -> String {
    format!("Progress: {}/{} ({:.0}%)", update.completed, update.total, update.percentage())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tubegrab_core::JobId;

    #[test]
    fn job_lines_carry_the_job_id() {
        let event = StatusEvent::job(JobId::new(2, "abc"), Phase::Downloading, "Downloading: Song");
        assert_eq!(render_status(&event, false), "• [#2 abc] Downloading: Song");
    }

    #[test]
    fn batch_lines_have_no_prefix() {
        let event = StatusEvent::batch(Phase::Failed, "Could not resolve media: gone");
        assert_eq!(
            render_status(&event, false),
            "✗ Could not resolve media: gone"
        );
    }

    #[test]
    fn color_only_tints_terminal_phases() {
        let done = StatusEvent::job(JobId::new(1, "a"), Phase::Complete, "Download complete: x");
        assert!(render_status(&done, true).starts_with(GREEN));

        let busy = StatusEvent::job(JobId::new(1, "a"), Phase::Downloading, "Downloading: x");
        assert_eq!(render_status(&busy, true), render_status(&busy, false));
    }

    #[test]
    fn progress_line_shows_percentage() {
        assert_eq!(render_progress(ProgressUpdate::new(1, 4)), "Progress: 1/4 (25%)");
        assert_eq!(render_progress(ProgressUpdate::new(0, 0)), "Progress: 0/0 (100%)");
    }

    #[test]
    fn hidden_sink_tracks_progress() {
        let sink = TerminalSink::new();
        sink.on_progress(ProgressUpdate::new(2, 5));
        assert_eq!(sink.bar.position(), 2);
        assert_eq!(sink.bar.length(), Some(5));
    }
}
