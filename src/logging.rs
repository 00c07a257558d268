//! Diagnostics via `tracing`.
//!
//! `MF_LOG` takes precedence over `[log] filter`; both fall back to `warn`.
//! The CLI logs to stderr. The TUI owns the terminal, so it only logs when
//! `[log] file` names a file to write to.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_ENV: &str = "MF_LOG";

fn filter(configured: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(configured.unwrap_or("warn")))
        .unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Compact stderr logging for CLI commands
pub fn init_stderr(configured: Option<&str>) {
    let _ = tracing_subscriber::registry()
        .with(filter(configured))
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .try_init();
}

/// Append-only file logging for the TUI
pub fn init_file(path: &Path, configured: Option<&str>) -> std::io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let _ = tracing_subscriber::registry()
        .with(filter(configured))
        .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        .try_init();
    Ok(())
}
