//! Scheduling strategies over the shared run contract.
//!
//! Every strategy dispatches items in input order, keeps at most
//! `processors` runs in flight, and funnels each item through
//! `ProcessRunner::run` exactly once:
//!
//! - **WorkerSet**: manually managed bounded worker set with slot refill
//!   and periodic live-worker status reports.
//! - **Pool**: fixed-size worker pool; the call returns once every item's
//!   result is in, remapped to input order.
//! - **PoolAsync**: the same pool, started first and joined afterwards
//!   through a handle.
//! - **Serial**: no concurrency at all; the degenerate baseline.

mod pool;
mod worker_set;

pub use pool::PoolHandle;

use crate::command::CommandTemplate;
use crate::config::RunConfig;
use crate::items::WorkItem;
use crate::runner::{ProcessRunner, RunResult};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// Scheduling strategy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Method {
    /// Manually managed bounded worker set with periodic status reports.
    WorkerSet,
    /// Fixed-size worker pool; waits for all results.
    Pool,
    /// Fixed-size worker pool; returns a handle joined after dispatch.
    PoolAsync,
    /// No concurrency; items run one after another in input order.
    Serial,
}

/// Run the whole batch with the configured strategy and return its results.
pub fn run_batch(
    config: &RunConfig,
    template: &CommandTemplate,
    items: Vec<WorkItem>,
    interrupt: Arc<AtomicBool>,
) -> Vec<RunResult> {
    let runner = ProcessRunner::new(config.timeout, config.debug, interrupt);

    match config.method {
        Method::WorkerSet => worker_set::run(
            &runner,
            template,
            items,
            config.processors,
            config.interval,
            config.debug,
        ),
        Method::Pool => pool::run_blocking(&runner, template, items, config.processors, config.debug),
        Method::PoolAsync => {
            let handle = pool::run_async(&runner, template, items, config.processors, config.debug);
            handle.wait()
        }
        Method::Serial => pool::run_serial(&runner, template, items),
    }
}
