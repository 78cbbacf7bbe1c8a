//! Tracing subscriber setup.
//!
//! CLI commands log to stderr. The dashboard owns the terminal, so it logs to
//! `PULSE_LOG_FILE` when set and drops everything otherwise.

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::AppError;

const DEFAULT_FILTER: &str = "legal_pulse=info";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    Tui,
}

/// Install the global subscriber. A second call is a no-op.
pub fn init(target: LogTarget) -> Result<(), AppError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let registry = tracing_subscriber::registry().with(filter);

    let installed = match (target, std::env::var_os("PULSE_LOG_FILE")) {
        (LogTarget::Stderr, _) => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init(),
        (LogTarget::Tui, Some(path)) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|e| {
                    AppError::new(2, format!("Failed to open log file '{}': {e}", path.to_string_lossy()))
                })?;
            registry
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .try_init()
        }
        (LogTarget::Tui, None) => registry.with(fmt::layer().with_writer(std::io::sink)).try_init(),
    };

    if installed.is_ok() {
        tracing::debug!(log_target = ?target, "logging initialized");
    }
    Ok(())
}
