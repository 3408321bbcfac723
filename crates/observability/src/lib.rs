//! Tracing setup shared by the HTTP server and the CLI.

/// Initialize JSON logging for long-running processes.
///
/// Safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(tracing::LogFormat::Json, "info");
}

pub mod tracing;

pub use crate::tracing::LogFormat;
