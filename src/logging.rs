//! Diagnostic log setup
//!
//! Appends one line per pipeline stage to a fixed relative log file. The log
//! is pure observability and is never part of the output contract.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Fixed relative path of the append-only diagnostic log.
pub const LOG_PATH: &str = "ocr-bridge.log";

/// Install the global logger writing to `path` in append mode.
pub fn init(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to install global logger")?;

    Ok(())
}
