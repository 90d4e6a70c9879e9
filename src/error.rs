//! Error taxonomy
//!
//! Input-validation failures get dedicated types so their messages are stable
//! for callers reading the embedded `error` field. Engine and rendering
//! failures are contextualized `anyhow` errors; nothing upstream matches on
//! them, they all land in the orchestrator's failure boundary.

use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced through the JSON contract rather than the exit code.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The input path does not reference an existing file.
    #[error("image not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The input file exists but has zero length.
    #[error("image file is empty: {}", .0.display())]
    EmptyFile(PathBuf),
}
