//! Error types for the runlist CLI.
//!
//! Uses thiserror for derive macros and provides user-actionable error
//! messages. Per-item failures are not errors: they are captured in the
//! item's `RunResult` and never abort the batch. Everything here is
//! batch-fatal and fails fast before any dispatch begins.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for runlist operations.
#[derive(Error, Debug)]
pub enum RunlistError {
    /// Invalid configuration: bad option values or an unusable command
    /// template.
    #[error("{0}")]
    Config(String),

    /// The item list source could not be resolved or read.
    #[error("failed to resolve item list: {0}")]
    List(String),
}

impl RunlistError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            RunlistError::Config(_) => exit_codes::CONFIG_ERROR,
            RunlistError::List(_) => exit_codes::CONFIG_ERROR,
        }
    }
}

/// Result type alias for runlist operations.
pub type Result<T> = std::result::Result<T, RunlistError>;
