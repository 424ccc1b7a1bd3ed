//! End-of-batch summary.

use tubegrab_core::BatchResult;

use super::{BOLD, GREEN, RED, RESET, YELLOW};

/// Lines describing a finished batch.
pub fn summary_lines(result: &BatchResult) -> Vec<String> {
    if result.is_clean() && result.total() > 0 {
        return vec![format!(
            "{BOLD}Done:{RESET} {GREEN}all {} item(s) downloaded{RESET}",
            result.total()
        )];
    }

    let mut lines = vec![format!(
        "{BOLD}Done:{RESET} {} succeeded, {} failed, {} cancelled",
        result.succeeded, result.failed, result.cancelled
    )];
    if result.was_cancelled {
        lines.push(format!("{YELLOW}Batch was cancelled before all items ran{RESET}"));
    }
    for failure in &result.errors {
        lines.push(format!("  {RED}✗{RESET} {}: {}", failure.job_id, failure.message));
    }
    lines
}

pub fn print_summary(result: &BatchResult) {
    println!();
    for line in summary_lines(result) {
        println!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tubegrab_core::{ItemOutcome, JobId};

    #[test]
    fn lists_each_failure() {
        let mut result = BatchResult::new();
        result.record(
            &JobId::new(1, "a"),
            &ItemOutcome::Success {
                path: "/music/a.mp3".into(),
            },
        );
        result.record(
            &JobId::new(2, "b"),
            &ItemOutcome::Skipped {
                reason: "No suitable stream found.".to_string(),
            },
        );

        let lines = summary_lines(&result);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("1 succeeded, 1 failed, 0 cancelled"));
        assert!(lines[1].contains("#2 b: No suitable stream found."));
    }

    #[test]
    fn clean_batch_is_one_line() {
        let mut result = BatchResult::new();
        for n in 1..=3 {
            result.record(
                &JobId::new(n, "x"),
                &ItemOutcome::Success {
                    path: "/music/x.mp3".into(),
                },
            );
        }

        let lines = summary_lines(&result);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("all 3 item(s) downloaded"));
    }

    #[test]
    fn empty_batch_reports_counts() {
        let lines = summary_lines(&BatchResult::new());
        assert!(lines[0].contains("0 succeeded, 0 failed, 0 cancelled"));
    }

    #[test]
    fn notes_cancellation() {
        let result = BatchResult {
            cancelled: 3,
            was_cancelled: true,
            ..BatchResult::new()
        };
        let lines = summary_lines(&result);
        assert!(lines.iter().any(|l| l.contains("cancelled before")));
    }
}
