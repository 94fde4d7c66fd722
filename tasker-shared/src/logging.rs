//! Tracing setup, standing in for the original `AbstractLogger`.
//!
//! The Python implementation left logger construction to an abstract base
//! class that concrete environments configured with handlers and formatters.
//! `tracing` replaces that whole layer: subscribers are installed once at
//! process start and every module logs through the `tracing` macros instead
//! of holding a logger instance.

use tracing_subscriber::EnvFilter;

/// Installs a global `tracing` subscriber reading its filter from
/// `RUST_LOG`, defaulting to `info` when unset.
///
/// Safe to call once per process. Intended to be the first thing
/// `tasker-server` does in `main`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
