//! Boundary layer: errors, defaults, pattern assets, files and the CLI

/// Command-line interface and batch file processing
pub mod cli;
/// Effect constants and runtime configuration defaults
pub mod configuration;
/// Error types and stage context
pub mod error;
/// PNG loading and export
pub mod image;
/// Structured log output
pub mod logging;
/// Named pattern registry
pub mod patterns;
/// Progress bars for batch runs
pub mod progress;
