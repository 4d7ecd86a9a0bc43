//! Structured log output for the command-line tool

use crate::io::error::{EngravingError, Result};
use tracing_subscriber::EnvFilter;

/// Default filter directive for a verbosity level
///
/// `RUST_LOG` takes precedence when set.
pub const fn level_for(verbosity: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Filter from `RUST_LOG`, falling back to `default_level`
pub fn build_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Install the global fmt subscriber writing to stderr
///
/// # Errors
///
/// Returns `Logging` if a global subscriber is already installed
pub fn init(verbosity: u8, quiet: bool) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(build_filter(level_for(verbosity, quiet)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| EngravingError::Logging {
            reason: e.to_string(),
        })
}
