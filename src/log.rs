// src/log.rs
use std::env;

use tracing_subscriber::EnvFilter;

pub const DEFAULT_LEVEL: &str = "info";

/// `RUST_LOG` wins; otherwise `LOG_LEVEL` (e.g. `DEBUG`), otherwise info.
/// Library code only emits `tracing` events; binaries call this once.
pub fn init_logging() {
    let filter = match env::var("RUST_LOG") {
        Ok(rust_log) => EnvFilter::new(rust_log),
        Err(_) => EnvFilter::new(level_from(env::var("LOG_LEVEL").ok())),
    };

    // Ignore a second init (tests, embedding apps).
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn level_from(value: Option<String>) -> String {
    value
        .map(|v| v.trim().to_lowercase())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| s!(DEFAULT_LEVEL))
}
