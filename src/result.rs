//! Output contract
//!
//! The JSON shape printed on stdout. Constructed once per invocation and
//! serialized immediately; there is no cross-call state.

use anyhow::Error;
use image::RgbImage;
use serde::{Deserialize, Serialize};

/// One recognized word/region with its confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordDetail {
    /// Recognized text
    pub text: String,
    /// Confidence score (0.0 - 1.0)
    pub confidence: f64,
}

/// The full recognition result.
///
/// Invariants: `word_count == words.len() == tdata.len()`; `confidence` is
/// the mean of the per-word scores (0.0 when empty); when `error` is present
/// every data field holds its empty default. Callers must distinguish
/// "failed" from "found nothing" by the presence of the `error` key.
#[derive(Debug, Clone, Serialize)]
pub struct RecognitionResult {
    /// Space-joined, trimmed concatenation of all word texts
    pub text: String,
    /// Word-count-weighted average confidence
    pub confidence: f64,
    /// Per-word details
    pub words: Vec<WordDetail>,
    /// Number of recognized words
    pub word_count: usize,
    /// Annotated image as a row x column x RGB matrix, or null
    pub im_show: Option<Vec<Vec<[u8; 3]>>>,
    /// Duplicate of `words`, kept for contract compatibility
    pub tdata: Vec<WordDetail>,
    /// Human-readable "<text> (<score>)" summary
    pub results_str: String,
    /// Failure message; absent on success and on "nothing recognized"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Full diagnostic chain for the failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_details: Option<String>,
}

impl RecognitionResult {
    /// The "nothing recognized" result: all data fields empty, no error key.
    pub fn empty() -> Self {
        Self {
            text: String::new(),
            confidence: 0.0,
            words: Vec::new(),
            word_count: 0,
            im_show: None,
            tdata: Vec::new(),
            results_str: String::new(),
            error: None,
            error_details: None,
        }
    }

    /// A failure result: empty data fields plus the error message and the
    /// full diagnostic chain.
    pub fn failure(err: &Error) -> Self {
        Self {
            error: Some(err.to_string()),
            error_details: Some(format!("{err:?}")),
            ..Self::empty()
        }
    }
}

/// Convert an annotated image into the nested row x column x channel matrix
/// embedded in the JSON contract.
pub fn image_matrix(image: &RgbImage) -> Vec<Vec<[u8; 3]>> {
    image
        .rows()
        .map(|row| row.map(|pixel| pixel.0).collect())
        .collect()
}
