//! Tracing configuration and log routing.
//!
//! Operators read engine fallbacks and request outcomes from these logs. The server logs to
//! stdout using a compact formatter and mirrors everything into `Config::log_file` through a
//! non‑blocking writer. Command-line tools log to stderr only.
use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::OnceLock;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::Config;

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Configure tracing subscribers for stdout and the configured log file.
///
/// - Respects `RUST_LOG` for filtering (defaults to `info`).
/// - Falls back to stdout only when the log file cannot be opened.
/// - Uses a global guard to keep the non‑blocking writer alive for the process lifetime.
pub fn init_tracing(config: &Config) {
    let registry = tracing_subscriber::registry()
        .with(env_filter("info"))
        .with(fmt::layer().with_target(false).compact());

    match open_log_writer(&config.log_file) {
        Ok(writer) => registry
            .with(
                fmt::layer()
                    .with_writer(writer)
                    .with_target(true)
                    .with_ansi(false)
                    .compact(),
            )
            .init(),
        Err(err) => {
            registry.init();
            tracing::warn!(
                path = %config.log_file.display(),
                error = %err,
                "File logging disabled"
            );
        }
    }
}

/// Configure a stderr-only subscriber for command-line tools.
///
/// CLI output belongs to the user on stdout, so diagnostics are routed to stderr and default to
/// `warn` unless `RUST_LOG` says otherwise.
pub fn init_cli_tracing() {
    tracing_subscriber::registry()
        .with(env_filter("warn"))
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}

fn env_filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive))
}

/// Open `path` for appending, creating missing parent directories, and wrap it in a
/// non‑blocking writer whose guard is parked in [`LOG_GUARD`].
fn open_log_writer(path: &Path) -> std::io::Result<NonBlocking> {
    if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let (writer, guard) = tracing_appender::non_blocking(file);
    let _ = LOG_GUARD.set(guard);
    Ok(writer)
}
