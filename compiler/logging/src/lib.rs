#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Simple logging utilities for the pipeline.
//!
//! Two channels coexist: `trace` writes short tagged lines to stderr for
//! operator-visible diagnostics, while library crates emit `tracing` events that
//! only show up once [`init`] has installed a subscriber.

use tracing_subscriber::EnvFilter;

/// Prints a trace message to stderr with module prefix.
pub fn trace(module: &str, msg: &str) {
    eprintln!("[TRACE][{}] {}", module, msg);
}

/// Build the filter used by [`init`]: `RUST_LOG` when set, else `default_level`.
pub fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global `tracing` subscriber writing to stderr.
///
/// Returns `false` when a subscriber was already installed; the existing one is kept.
pub fn init(default_level: &str) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .is_ok()
}
