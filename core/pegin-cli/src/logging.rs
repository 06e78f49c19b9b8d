//! File logging for the CLI.
//!
//! stdout carries the session JSON, so logs go to `<root>/logs/pegin.log`
//! (rotated daily). `PEGIN_DEBUG_LOG=1` forces debug level; otherwise
//! `RUST_LOG` applies, defaulting to `info`.

use std::env;

use pegin_core::StorageConfig;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const DEBUG_ENV: &str = "PEGIN_DEBUG_LOG";

/// Returns the appender guard; logs are flushed when it drops.
pub fn init(storage: Option<&StorageConfig>) -> Option<WorkerGuard> {
    let filter = if debug_enabled() {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let storage = storage?;
    storage.ensure_dirs().ok()?;

    let appender = tracing_appender::rolling::daily(storage.logs_dir(), "pegin.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .ok()?;

    Some(guard)
}

fn debug_enabled() -> bool {
    env::var(DEBUG_ENV)
        .map(|value| matches!(value.as_str(), "1" | "true" | "TRUE" | "yes" | "YES"))
        .unwrap_or(false)
}
