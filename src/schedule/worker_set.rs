//! Manually managed bounded worker set.
//!
//! The scheduler owns a pending queue and a live-worker set of at most
//! `slots` entries. It refills empty slots from the head of the queue in
//! input order, reaps completions from an mpsc channel with a bounded wait
//! (no busy-spin), and in debug mode reports the live set every `interval`
//! seconds. The loop ends when queue and live set are both empty.

use crate::command::{CommandTemplate, build_argv};
use crate::items::WorkItem;
use crate::report;
use crate::runner::{ProcessRunner, RunResult};
use std::collections::VecDeque;
use std::sync::mpsc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Bounded wait for a completion before re-checking fill and report duties.
const REAP_WAIT: Duration = Duration::from_millis(200);

/// One live execution unit: dropped from the set as soon as its completion
/// message is reaped.
struct WorkerHandle {
    id: usize,
    token: String,
    handle: JoinHandle<()>,
}

pub fn run(
    runner: &ProcessRunner,
    template: &CommandTemplate,
    items: Vec<WorkItem>,
    slots: usize,
    interval: Duration,
    debug: bool,
) -> Vec<RunResult> {
    let parent_pid = std::process::id();
    let mut pending: VecDeque<(usize, WorkItem)> = items.into_iter().enumerate().collect();
    let mut live: Vec<WorkerHandle> = Vec::new();
    let mut results = Vec::with_capacity(pending.len());
    let (tx, rx) = mpsc::channel::<(usize, RunResult)>();

    let started = Instant::now();
    let mut next_report = interval;

    loop {
        // Fill: top up empty slots from the head of the queue. An interrupt
        // stops dispatch; the remaining pending items are abandoned.
        while live.len() < slots && !runner.interrupted() {
            let Some((id, item)) = pending.pop_front() else {
                break;
            };
            let argv = build_argv(template, &item, parent_pid, id);
            let token = item.token.clone();
            let tx = tx.clone();
            let runner = runner.clone();
            let handle = thread::spawn(move || {
                let result = runner.run(&argv, &item);
                let _ = tx.send((id, result));
            });
            if debug {
                eprintln!("worker {} started for {}", id, token);
            }
            live.push(WorkerHandle { id, token, handle });
        }

        if live.is_empty() && (pending.is_empty() || runner.interrupted()) {
            break;
        }

        // Reap: wait for a completion, bounded so the status report still
        // fires while long runs are in flight.
        match rx.recv_timeout(REAP_WAIT) {
            Ok((id, result)) => {
                if let Some(pos) = live.iter().position(|w| w.id == id) {
                    let worker = live.swap_remove(pos);
                    let _ = worker.handle.join();
                    if debug {
                        eprintln!("worker {} finished for {}", id, worker.token);
                    }
                }
                results.push(result);
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }

        if debug && started.elapsed() >= next_report {
            report_live(&live, started.elapsed());
            next_report += interval;
        }
    }

    results
}

/// Periodic status report: the currently-alive workers and their items.
fn report_live(live: &[WorkerHandle], elapsed: Duration) {
    eprintln!(
        "[{}] live workers ({:.2}s elapsed):",
        report::timestamp(),
        elapsed.as_secs_f64()
    );
    for worker in live {
        eprintln!("  worker {} --> {}", worker.id, worker.token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::RunStatus;
    use serial_test::serial;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::sync::atomic::AtomicBool;

    fn runner(timeout_secs: u64) -> ProcessRunner {
        ProcessRunner::new(
            Duration::from_secs(timeout_secs),
            false,
            Arc::new(AtomicBool::new(false)),
        )
    }

    fn items(tokens: &[&str]) -> Vec<WorkItem> {
        tokens.iter().copied().map(WorkItem::new).collect()
    }

    #[test]
    fn dispatches_every_item_exactly_once() {
        let template = CommandTemplate::parse("true").unwrap();
        let results = run(
            &runner(10),
            &template,
            items(&["a", "b", "c", "d", "e"]),
            2,
            Duration::from_secs(10),
            false,
        );

        assert_eq!(results.len(), 5);
        let tokens: HashSet<_> = results.iter().map(|r| r.item.token.as_str()).collect();
        assert_eq!(tokens.len(), 5);
        assert!(results.iter().all(|r| r.is_success()));
    }

    #[test]
    fn empty_queue_finishes_immediately() {
        let template = CommandTemplate::parse("true").unwrap();
        let results = run(
            &runner(10),
            &template,
            Vec::new(),
            4,
            Duration::from_secs(10),
            false,
        );
        assert!(results.is_empty());
    }

    #[test]
    #[serial]
    fn slots_bound_the_batch_duration() {
        // Four ~0.5s sleeps across two slots take at least two rounds.
        let template = CommandTemplate::parse("sh -c 'sleep \"$1\"' runner").unwrap();
        let started = Instant::now();
        let results = run(
            &runner(10),
            &template,
            items(&["0.5", "0.5", "0.5", "0.5"]),
            2,
            Duration::from_secs(10),
            false,
        );
        let elapsed = started.elapsed();

        assert_eq!(results.len(), 4);
        assert!(results.iter().all(|r| r.is_success()));
        assert!(elapsed >= Duration::from_millis(900), "ran too parallel: {:?}", elapsed);
    }

    #[test]
    fn timeouts_are_reported_per_item() {
        let template = CommandTemplate::parse("sh -c 'sleep \"$1\"' runner").unwrap();
        let results = run(
            &runner(1),
            &template,
            items(&["0.1", "30"]),
            2,
            Duration::from_secs(10),
            false,
        );

        assert_eq!(results.len(), 2);
        let by_token = |token: &str| {
            results
                .iter()
                .find(|r| r.item.token == token)
                .map(|r| r.status)
        };
        assert!(matches!(
            by_token("0.1"),
            Some(RunStatus::Completed { .. })
        ));
        assert_eq!(by_token("30"), Some(RunStatus::TimedOut));
    }

    #[test]
    fn interrupt_stops_dispatching_pending_items() {
        let interrupt = Arc::new(AtomicBool::new(true));
        let runner = ProcessRunner::new(Duration::from_secs(10), false, interrupt);
        let template = CommandTemplate::parse("sleep 30").unwrap();

        let started = Instant::now();
        let results = run(
            &runner,
            &template,
            items(&["a", "b", "c"]),
            2,
            Duration::from_secs(10),
            false,
        );

        assert!(results.is_empty());
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
