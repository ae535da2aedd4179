//! `tracing` subscriber setup for the CLI, the terminal explorer, and the mock server.

use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

pub const LOG_ENV: &str = "TREEWARD_LOG";
pub const LOG_FILE_ENV: &str = "TREEWARD_LOG_FILE";

fn filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default))
}

/// Log to stderr, filtered by `TREEWARD_LOG` (default `warn`).
pub fn init_stderr() {
    let _ = tracing_subscriber::registry()
        .with(filter("warn"))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init();
}

/// Full-screen mode owns the terminal, so logging only happens when `TREEWARD_LOG_FILE`
/// names a file to append to.
pub fn init_for_tui() -> Result<()> {
    let Some(path) = std::env::var_os(LOG_FILE_ENV).filter(|v| !v.is_empty()) else {
        return Ok(());
    };
    let path = PathBuf::from(path);
    let file = File::options()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open log file {}", path.display()))?;

    let _ = tracing_subscriber::registry()
        .with(filter("info"))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init();
    Ok(())
}
