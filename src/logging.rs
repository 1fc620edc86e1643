//! Tracing setup for the pipeline binaries.
//!
//! Progress messages go to stdout with a compact formatter, filtered by
//! `RUST_LOG` (default `info`). Setting `OXBRAIN_LOG_FILE` additionally
//! appends logs to that file through a non-blocking writer; without it no
//! file or directory is touched.

use std::sync::OnceLock;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Install the stdout subscriber and, when configured, the file layer.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stdout_layer = fmt::layer().with_target(false).compact();
    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer);

    match file_writer() {
        Some(writer) => registry
            .with(
                fmt::layer()
                    .with_writer(writer)
                    .with_ansi(false)
                    .compact(),
            )
            .init(),
        None => registry.init(),
    }
}

/// Non-blocking writer for the file pointed at by `OXBRAIN_LOG_FILE`.
///
/// Returns `None` when the variable is unset or the file cannot be opened.
/// The worker guard is parked globally so buffered lines survive until exit.
fn file_writer() -> Option<NonBlocking> {
    let path = std::env::var("OXBRAIN_LOG_FILE").ok()?;
    match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
    {
        Ok(file) => {
            let (writer, guard) = tracing_appender::non_blocking(file);
            let _ = LOG_GUARD.set(guard);
            Some(writer)
        }
        Err(err) => {
            eprintln!("Failed to open log file {path}: {err}");
            None
        }
    }
}
