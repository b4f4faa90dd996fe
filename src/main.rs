//! Runlist: run an external command once per work item under bounded
//! concurrency, with per-item timeouts and process-subtree cleanup.
//!
//! This is the main entry point for the `runlist` CLI. It resolves the
//! configuration and the item list, installs the interrupt handler, hands
//! the batch to the selected scheduling strategy, and prints the summary.
//! The exit code reflects configuration errors only; per-item timeouts and
//! launch failures are part of the summary, not failures of the tool.

pub mod cli;
pub mod command;
pub mod config;
pub mod error;
pub mod exit_codes;
pub mod items;
pub mod report;
pub mod runner;
pub mod schedule;

use cli::Cli;
use error::Result;
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

fn main() -> ExitCode {
    let cli = Cli::parse_args();

    match run(cli) {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(err) => {
            // Print user-actionable error message to stderr
            eprintln!("Error: {}", err);
            ExitCode::from(err.exit_code() as u8)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = config::resolve(&cli)?;
    let template = command::CommandTemplate::parse(&config.command)?;
    let items = items::resolve_items(&config.list, config.debug)?;

    if config.debug {
        eprintln!("config: {:?}", config);
        eprintln!(
            "items: {:?}",
            items.iter().map(|i| i.token.as_str()).collect::<Vec<_>>()
        );
    }

    let interrupt = Arc::new(AtomicBool::new(false));
    {
        let interrupt = Arc::clone(&interrupt);
        ctrlc::set_handler(move || {
            eprintln!("\ninterrupt received; stopping dispatch and killing in-flight work");
            interrupt.store(true, Ordering::SeqCst);
        })
        .expect("failed to set Ctrl+C handler");
    }

    println!("Start time: {}", report::timestamp());
    let started = Instant::now();

    let results = schedule::run_batch(&config, &template, items, interrupt);

    report::print_summary(&results, started.elapsed());
    Ok(())
}
