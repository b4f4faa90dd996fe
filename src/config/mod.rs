//! Configuration for a runlist batch.
//!
//! Three layers, lowest priority first: built-in defaults, an optional YAML
//! config file, and CLI options. The merged result is validated once and
//! frozen into a `RunConfig` that is passed explicitly into the engine.
//! There is no ambient configuration state anywhere.

use crate::cli::Cli;
use crate::error::{Result, RunlistError};
use crate::schedule::Method;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// File-level configuration, prior to CLI overrides.
///
/// Unknown fields in the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Command template to run per item (empty means "not configured").
    pub cmd: String,

    /// Verbose diagnostic output.
    pub debug: bool,

    /// Seconds between live-worker status reports (worker-set method only).
    #[serde(default = "default_interval")]
    pub interval: u64,

    /// List file(s)/glob or inline item list.
    #[serde(default = "default_list")]
    pub list: String,

    /// Scheduling method.
    #[serde(default = "default_method")]
    pub method: Method,

    /// Maximum number of concurrent workers.
    #[serde(default = "default_processors")]
    pub processors: usize,

    /// Per-item timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cmd: String::new(),
            debug: false,
            interval: default_interval(),
            list: default_list(),
            method: default_method(),
            processors: default_processors(),
            timeout: default_timeout(),
        }
    }
}

fn default_interval() -> u64 {
    10
}

fn default_list() -> String {
    "urllist.txt".to_string()
}

fn default_method() -> Method {
    Method::PoolAsync
}

fn default_processors() -> usize {
    4
}

fn default_timeout() -> u64 {
    100
}

impl Config {
    /// Load config from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            RunlistError::Config(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_yaml(&content)
    }

    /// Parse config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| RunlistError::Config(format!("failed to parse config YAML: {}", e)))
    }

    /// Apply CLI overrides on top of this config.
    pub fn merge_cli(mut self, cli: &Cli) -> Self {
        if let Some(cmd) = &cli.cmd {
            self.cmd = cmd.clone();
        }
        if cli.debug {
            self.debug = true;
        }
        if let Some(interval) = cli.interval {
            self.interval = interval;
        }
        if let Some(list) = &cli.list {
            self.list = list.clone();
        }
        if let Some(method) = cli.method {
            self.method = method;
        }
        if let Some(processors) = cli.processors {
            self.processors = processors;
        }
        if let Some(timeout) = cli.timeout {
            self.timeout = timeout;
        }
        self
    }

    /// Validate and freeze into the immutable configuration the engine runs
    /// with. Fails fast before any dispatch begins.
    pub fn into_run_config(self) -> Result<RunConfig> {
        if self.cmd.trim().is_empty() {
            return Err(RunlistError::Config(
                "no command template configured; pass --cmd or set cmd in the config file"
                    .to_string(),
            ));
        }
        if self.processors == 0 {
            return Err(RunlistError::Config(
                "processors must be greater than 0".to_string(),
            ));
        }
        if self.timeout == 0 {
            return Err(RunlistError::Config(
                "timeout must be greater than 0".to_string(),
            ));
        }
        if self.interval == 0 {
            return Err(RunlistError::Config(
                "interval must be greater than 0".to_string(),
            ));
        }

        Ok(RunConfig {
            command: self.cmd,
            debug: self.debug,
            interval: Duration::from_secs(self.interval),
            list: self.list,
            method: self.method,
            processors: self.processors,
            timeout: Duration::from_secs(self.timeout),
        })
    }
}

/// Immutable, validated configuration for one batch.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub command: String,
    pub debug: bool,
    pub interval: Duration,
    pub list: String,
    pub method: Method,
    pub processors: usize,
    pub timeout: Duration,
}

/// Resolve the effective configuration from the CLI: optional config file,
/// CLI overrides, then validation.
pub fn resolve(cli: &Cli) -> Result<RunConfig> {
    let file = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    file.merge_cli(cli).into_run_config()
}
