//! Timestamps and the end-of-batch summary.
//!
//! Diagnostics go to stderr everywhere else in the tool; the summary here
//! is the result listing, so it goes to stdout.

use crate::runner::{RunResult, RunStatus};
use chrono::Local;
use std::time::Duration;

/// Wall-clock timestamp in the `YYYY-MM-DD HH:MM:SS` form used across the
/// tool's output.
pub fn timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Per-status counts over a batch's results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Tally {
    pub completed: usize,
    pub succeeded: usize,
    pub timed_out: usize,
    pub launch_failed: usize,
}

pub fn tally(results: &[RunResult]) -> Tally {
    let mut tally = Tally::default();
    for result in results {
        match result.status {
            RunStatus::Completed { .. } => tally.completed += 1,
            RunStatus::TimedOut => tally.timed_out += 1,
            RunStatus::LaunchFailed => tally.launch_failed += 1,
        }
        if result.is_success() {
            tally.succeeded += 1;
        }
    }
    tally
}

/// Print the per-item listing, aggregate counts, and total elapsed time.
pub fn print_summary(results: &[RunResult], elapsed: Duration) {
    for result in results {
        let tag = match result.status {
            RunStatus::Completed {
                exit_code: Some(code),
            } => format!("completed (exit {})", code),
            RunStatus::Completed { exit_code: None } => "completed (signal)".to_string(),
            RunStatus::TimedOut => "timed out".to_string(),
            RunStatus::LaunchFailed => "launch failed".to_string(),
        };
        let pid = result
            .pid
            .map(|p| p.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<20} pid {:<8} {:>7.2}s  {}",
            tag,
            pid,
            result.duration.as_secs_f64(),
            result.item.token
        );
    }

    let tally = tally(results);
    println!();
    println!(
        "{} completed ({} exit 0), {} timed out, {} failed to launch ({} total)",
        tally.completed,
        tally.succeeded,
        tally.timed_out,
        tally.launch_failed,
        results.len()
    );
    println!("Total time: {:.2}s", elapsed.as_secs_f64());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::WorkItem;

    fn result(token: &str, status: RunStatus) -> RunResult {
        RunResult {
            item: WorkItem::new(token),
            pid: Some(1234),
            status,
            duration: Duration::from_millis(500),
        }
    }

    #[test]
    fn timestamp_has_the_expected_shape() {
        let ts = timestamp();
        // YYYY-MM-DD HH:MM:SS
        assert_eq!(ts.len(), 19);
        assert_eq!(&ts[4..5], "-");
        assert_eq!(&ts[10..11], " ");
        assert_eq!(&ts[13..14], ":");
    }

    #[test]
    fn tally_counts_every_status() {
        let results = vec![
            result("a", RunStatus::Completed { exit_code: Some(0) }),
            result("b", RunStatus::Completed { exit_code: Some(1) }),
            result("c", RunStatus::TimedOut),
            result("d", RunStatus::LaunchFailed),
        ];

        let tally = tally(&results);
        assert_eq!(tally.completed, 2);
        assert_eq!(tally.succeeded, 1);
        assert_eq!(tally.timed_out, 1);
        assert_eq!(tally.launch_failed, 1);
    }

    #[test]
    fn tally_of_empty_batch_is_zero() {
        assert_eq!(tally(&[]), Tally::default());
    }

    #[test]
    fn print_summary_does_not_panic() {
        let results = vec![
            result("a", RunStatus::Completed { exit_code: Some(0) }),
            result("b", RunStatus::TimedOut),
        ];
        print_summary(&results, Duration::from_secs(2));
    }
}
