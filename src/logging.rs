//! Optional `tracing` subscriber setup.
//!
//! The library only emits events; applications that do not install their
//! own subscriber can call [`init_tracing`].

use crate::config::{ClientConfig, DEFAULT_LOG_LEVEL};
use tracing_subscriber::EnvFilter;

/// Install a `fmt` subscriber filtered by `RUST_LOG`, falling back to
/// `config.log_level`.
///
/// Returns `false` when a global subscriber was already set; the existing
/// one is left in place.
pub fn init_tracing(config: &ClientConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}
