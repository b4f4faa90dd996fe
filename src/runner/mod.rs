//! External process execution with timeout and subtree termination.
//!
//! `ProcessRunner` launches one command per work item, waits up to the
//! configured timeout, and on expiry (or operator interrupt) tears down the
//! command's entire process subtree before recording the outcome. It knows
//! nothing about scheduling; every strategy funnels through `run`.

mod proc_tree;

pub use proc_tree::kill_tree;

use crate::items::WorkItem;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

/// How often a waiting runner re-checks its child.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Outcome tag for a single run. There is no fourth outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// The command exited on its own within the timeout.
    Completed {
        /// Exit code, or `None` if the command died to a signal.
        exit_code: Option<i32>,
    },
    /// The command exceeded its timeout (or an interrupt arrived) and its
    /// subtree was killed. A designed outcome, not a system failure.
    TimedOut,
    /// The command could not be started at all. Never retried.
    LaunchFailed,
}

/// Result of one dispatched run.
#[derive(Debug, Clone)]
pub struct RunResult {
    /// The item this run corresponds to.
    pub item: WorkItem,
    /// Pid of the spawned process, if the launch succeeded.
    pub pid: Option<u32>,
    /// How the run ended.
    pub status: RunStatus,
    /// Wall-clock duration of the run.
    pub duration: Duration,
}

impl RunResult {
    /// Whether the command ran to completion with exit code 0.
    pub fn is_success(&self) -> bool {
        matches!(self.status, RunStatus::Completed { exit_code: Some(0) })
    }
}

/// Launches one external command per call and enforces the per-item
/// timeout. Cheap to clone; workers each hold their own copy.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    timeout: Duration,
    debug: bool,
    interrupt: Arc<AtomicBool>,
}

impl ProcessRunner {
    pub fn new(timeout: Duration, debug: bool, interrupt: Arc<AtomicBool>) -> Self {
        Self {
            timeout,
            debug,
            interrupt,
        }
    }

    /// Whether an operator interrupt has been requested.
    pub fn interrupted(&self) -> bool {
        self.interrupt.load(Ordering::SeqCst)
    }

    /// Launch `argv` and block until it exits, the timeout elapses, or an
    /// interrupt arrives. Timeout and interrupt both kill the whole process
    /// subtree (children first, then the root) before returning.
    pub fn run(&self, argv: &[String], item: &WorkItem) -> RunResult {
        let started = Instant::now();

        let Some((program, args)) = argv.split_first() else {
            return self.result(item, None, RunStatus::LaunchFailed, started);
        };

        if self.debug {
            eprintln!("dispatch {}: {}", item.token, shell_words::join(argv));
        }

        let mut child = match Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                eprintln!(
                    "failed to launch '{}' for {}: {}\n\
                     Fix: ensure the command is installed and in PATH.",
                    program, item.token, e
                );
                return self.result(item, None, RunStatus::LaunchFailed, started);
            }
        };

        let pid = child.id();
        if self.debug {
            eprintln!("spawned pid {} for {}", pid, item.token);
        }

        loop {
            match child.try_wait() {
                Ok(Some(status)) => {
                    return self.result(
                        item,
                        Some(pid),
                        RunStatus::Completed {
                            exit_code: status.code(),
                        },
                        started,
                    );
                }
                Ok(None) => {
                    if started.elapsed() >= self.timeout || self.interrupted() {
                        self.kill_subtree(&mut child, item);
                        return self.result(item, Some(pid), RunStatus::TimedOut, started);
                    }
                    thread::sleep(POLL_INTERVAL);
                }
                Err(e) => {
                    // Lost visibility of the child; reclaim it like a timeout.
                    eprintln!("failed to check pid {} for {}: {}", pid, item.token, e);
                    self.kill_subtree(&mut child, item);
                    return self.result(item, Some(pid), RunStatus::TimedOut, started);
                }
            }
        }
    }

    /// Kill every descendant of the child, then the child itself, and reap
    /// it. Targets that exited in the meantime are not an error.
    fn kill_subtree(&self, child: &mut Child, item: &WorkItem) {
        kill_tree(child.id(), self.debug);
        let _ = child.kill();
        let _ = child.wait();
        if self.debug {
            eprintln!("killed pid {} and descendants for {}", child.id(), item.token);
        }
    }

    fn result(
        &self,
        item: &WorkItem,
        pid: Option<u32>,
        status: RunStatus,
        started: Instant,
    ) -> RunResult {
        RunResult {
            item: item.clone(),
            pid,
            status,
            duration: started.elapsed(),
        }
    }
}
