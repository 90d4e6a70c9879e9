//! External worker backend
//!
//! Runs a configured command with the image path and parses its stdout as
//! JSON. A top-level array becomes one mapped page record per object entry;
//! any other response shape is treated as "no pages". No timeout is applied,
//! so a hung worker hangs the process.

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{bail, Context, Result};
use serde_json::Value;
use tracing::{info, warn};

use crate::config::EngineConfig;

use super::{PageRecord, RecognitionEngine};

/// OCR backend that shells out to an external recognizer.
pub struct WorkerEngine {
    command: PathBuf,
    lang: String,
}

impl WorkerEngine {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            command: config.worker_command.clone(),
            lang: config.lang.clone(),
        }
    }
}

impl RecognitionEngine for WorkerEngine {
    fn recognize(&mut self, image_path: &Path) -> Result<Vec<PageRecord>> {
        info!("invoking OCR worker {}", self.command.display());

        let output = Command::new(&self.command)
            .arg(image_path)
            .arg("--lang")
            .arg(&self.lang)
            .output()
            .with_context(|| format!("failed to run OCR worker {}", self.command.display()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "OCR worker exited with {}: {}",
                output.status,
                stderr.trim()
            );
        }

        let raw: Value = serde_json::from_slice(&output.stdout)
            .context("OCR worker produced invalid JSON")?;
        Ok(parse_pages(raw))
    }
}

/// Turn the worker's raw JSON response into page records. Only a top-level
/// array counts as a page sequence; entries that are not objects are
/// dropped with a warning.
fn parse_pages(raw: Value) -> Vec<PageRecord> {
    let Value::Array(items) = raw else {
        warn!("worker response is not a sequence; treating as no pages");
        return Vec::new();
    };

    items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(map) => Some(PageRecord::Mapped(map)),
            other => {
                warn!("skipping non-object page record: {other}");
                None
            }
        })
        .collect()
}
