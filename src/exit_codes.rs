//! Exit code constants for the runlist CLI.
//!
//! Per-item outcomes (timeouts, launch failures) never affect the exit
//! status; only configuration problems do:
//! - 0: Success (the batch ran, whatever the individual outcomes)
//! - 1: Configuration error (bad option values, unreadable list source)

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// Configuration error: invalid option values, empty command template,
/// or an unreadable item list source. The batch never starts.
pub const CONFIG_ERROR: i32 = 1;
