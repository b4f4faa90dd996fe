//! CLI argument parsing for runlist.
//!
//! Uses clap derive macros for declarative argument definitions. Every
//! option is optional here; merging with the config file and built-in
//! defaults, plus validation, happens in the `config` module.

use crate::schedule::Method;
use clap::Parser;
use std::path::PathBuf;

/// Runlist: run an external command once per work item, in parallel, with
/// per-item timeouts and process-tree cleanup.
///
/// Work items come from list files (one item per line, `#`/`!` comment
/// lines) or from an inline space/comma-separated list. Each item's command
/// gets the item token plus `--ppid`/`--pid`/`--alias` bookkeeping
/// arguments appended.
#[derive(Parser, Debug)]
#[command(name = "runlist")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Command template to run per item; may carry fixed leading arguments
    /// (split with shell quoting rules).
    #[arg(short, long)]
    pub cmd: Option<String>,

    /// Show debug info (dispatch traces, kill logs, status reports).
    #[arg(short, long)]
    pub debug: bool,

    /// Seconds between live-worker status reports (worker-set method only).
    #[arg(short, long)]
    pub interval: Option<u64>,

    /// List file(s) or glob to evaluate, or an inline space/comma-separated
    /// item list.
    #[arg(short, long)]
    pub list: Option<String>,

    /// Scheduling method.
    #[arg(short, long, value_enum)]
    pub method: Option<Method>,

    /// Maximum number of concurrent workers.
    #[arg(short, long)]
    pub processors: Option<usize>,

    /// Per-item timeout in seconds.
    #[arg(short, long)]
    pub timeout: Option<u64>,

    /// Optional YAML config file supplying defaults for the options above.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_debug_assert() {
        // Verifies the CLI arguments configuration is valid
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_no_arguments() {
        let cli = Cli::try_parse_from(["runlist"]).unwrap();
        assert!(cli.cmd.is_none());
        assert!(!cli.debug);
        assert!(cli.interval.is_none());
        assert!(cli.list.is_none());
        assert!(cli.method.is_none());
        assert!(cli.processors.is_none());
        assert!(cli.timeout.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn parse_full() {
        let cli = Cli::try_parse_from([
            "runlist",
            "--cmd",
            "checker --max 60",
            "--debug",
            "--interval",
            "5",
            "--list",
            "urls/*.txt",
            "--method",
            "worker-set",
            "--processors",
            "20",
            "--timeout",
            "15",
        ])
        .unwrap();

        assert_eq!(cli.cmd.as_deref(), Some("checker --max 60"));
        assert!(cli.debug);
        assert_eq!(cli.interval, Some(5));
        assert_eq!(cli.list.as_deref(), Some("urls/*.txt"));
        assert_eq!(cli.method, Some(Method::WorkerSet));
        assert_eq!(cli.processors, Some(20));
        assert_eq!(cli.timeout, Some(15));
    }

    #[test]
    fn parse_short_flags() {
        let cli =
            Cli::try_parse_from(["runlist", "-c", "checker", "-d", "-p", "4", "-t", "30"]).unwrap();
        assert_eq!(cli.cmd.as_deref(), Some("checker"));
        assert!(cli.debug);
        assert_eq!(cli.processors, Some(4));
        assert_eq!(cli.timeout, Some(30));
    }

    #[test]
    fn parse_every_method_variant() {
        for (text, method) in [
            ("worker-set", Method::WorkerSet),
            ("pool", Method::Pool),
            ("pool-async", Method::PoolAsync),
            ("serial", Method::Serial),
        ] {
            let cli = Cli::try_parse_from(["runlist", "--method", text]).unwrap();
            assert_eq!(cli.method, Some(method));
        }
    }

    #[test]
    fn parse_unknown_method_is_rejected() {
        assert!(Cli::try_parse_from(["runlist", "--method", "fastest"]).is_err());
    }

    #[test]
    fn parse_config_path() {
        let cli = Cli::try_parse_from(["runlist", "--config", "runlist.yaml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("runlist.yaml")));
    }
}
