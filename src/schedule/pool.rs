//! Fixed-size worker pool with blocking, non-blocking, and serial modes.
//!
//! The pool never allocates more slots than there are items. Workers pull
//! `(input index, item)` pairs from a shared queue and report indexed
//! results over a channel; draining remaps them back to input order, so the
//! returned sequence matches the input sequence regardless of completion
//! order. Serial mode runs on the calling thread with the same run
//! contract and no concurrency primitive at all.

use crate::command::{CommandTemplate, build_argv};
use crate::items::WorkItem;
use crate::runner::{ProcessRunner, RunResult};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, mpsc};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Bounded wait while draining, so an interrupt is noticed promptly.
const DRAIN_WAIT: Duration = Duration::from_millis(200);

/// Handle to a pool started in non-blocking mode.
///
/// The pool is closed to new work from the moment it is created; `wait`
/// drains it, joins the workers, and returns the results in input order.
pub struct PoolHandle {
    rx: mpsc::Receiver<(usize, RunResult)>,
    workers: Vec<JoinHandle<()>>,
    expected: usize,
    runner: ProcessRunner,
}

/// Apply the runner to every item across the pool and wait for all results.
pub fn run_blocking(
    runner: &ProcessRunner,
    template: &CommandTemplate,
    items: Vec<WorkItem>,
    slots: usize,
    debug: bool,
) -> Vec<RunResult> {
    run_async(runner, template, items, slots, debug).wait()
}

/// Start the pool and return immediately with a handle to its results.
pub fn run_async(
    runner: &ProcessRunner,
    template: &CommandTemplate,
    items: Vec<WorkItem>,
    slots: usize,
    debug: bool,
) -> PoolHandle {
    let expected = items.len();
    // Never allocate more concurrent slots than there are items.
    let slots = slots.min(expected);
    let parent_pid = std::process::id();

    let queue: Arc<Mutex<VecDeque<(usize, WorkItem)>>> =
        Arc::new(Mutex::new(items.into_iter().enumerate().collect()));
    let template = Arc::new(template.clone());
    let (tx, rx) = mpsc::channel();

    let mut workers = Vec::with_capacity(slots);
    for slot in 0..slots {
        let queue = Arc::clone(&queue);
        let template = Arc::clone(&template);
        let tx = tx.clone();
        let runner = runner.clone();
        workers.push(thread::spawn(move || {
            if debug {
                eprintln!("pool worker {} started", slot);
            }
            loop {
                if runner.interrupted() {
                    break;
                }
                let next = queue.lock().ok().and_then(|mut q| q.pop_front());
                let Some((id, item)) = next else { break };
                let argv = build_argv(&template, &item, parent_pid, id);
                let result = runner.run(&argv, &item);
                if tx.send((id, result)).is_err() {
                    break;
                }
            }
            if debug {
                eprintln!("pool worker {} done", slot);
            }
        }));
    }

    PoolHandle {
        rx,
        workers,
        expected,
        runner: runner.clone(),
    }
}

/// Run every item in input order on the calling thread.
pub fn run_serial(
    runner: &ProcessRunner,
    template: &CommandTemplate,
    items: Vec<WorkItem>,
) -> Vec<RunResult> {
    let parent_pid = std::process::id();
    let mut results = Vec::with_capacity(items.len());
    for (id, item) in items.into_iter().enumerate() {
        if runner.interrupted() {
            break;
        }
        let argv = build_argv(template, &item, parent_pid, id);
        results.push(runner.run(&argv, &item));
    }
    results
}

impl PoolHandle {
    /// Block until every item has reported or an interrupt arrives, then
    /// join the workers and return the results in input order.
    ///
    /// On interrupt the join is abandoned: the partial results collected so
    /// far are returned, and the workers exit on their own once their
    /// runners have killed the in-flight subtrees.
    pub fn wait(self) -> Vec<RunResult> {
        let mut collected: Vec<Option<RunResult>> = (0..self.expected).map(|_| None).collect();
        let mut received = 0;
        let mut aborted = false;

        while received < self.expected {
            match self.rx.recv_timeout(DRAIN_WAIT) {
                Ok((id, result)) => {
                    collected[id] = Some(result);
                    received += 1;
                }
                Err(mpsc::RecvTimeoutError::Timeout) => {
                    if self.runner.interrupted() {
                        eprintln!(
                            "interrupt received while draining the pool; results may be incomplete"
                        );
                        aborted = true;
                        break;
                    }
                }
                Err(mpsc::RecvTimeoutError::Disconnected) => break,
            }
        }

        if !aborted {
            for worker in self.workers {
                let _ = worker.join();
            }
        }

        collected.into_iter().flatten().collect()
    }

    /// Whether every worker has exited. Results are only valid once the
    /// handle has been drained through `wait`.
    #[allow(dead_code)]
    pub fn is_finished(&self) -> bool {
        self.workers.iter().all(|w| w.is_finished())
    }
}
