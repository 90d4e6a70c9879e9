//! Aggregator
//!
//! Pure fan-out of the parallel text/score sequences into everything the
//! output contract derives from them. No I/O, no side effects.

use crate::result::WordDetail;

/// Aggregated view of one page's recognition output.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
    /// One detail per recognized word, in original order
    pub words: Vec<WordDetail>,
    /// `"<text> (<score>)"` pairs joined by single spaces
    pub summary: String,
    /// All texts joined by single spaces, trimmed
    pub full_text: String,
    /// Mean score, or exactly 0.0 for empty input
    pub avg_confidence: f64,
}

/// Aggregate parallel texts and scores. Pairing stops at the shorter
/// sequence; `full_text` still covers every text.
pub fn aggregate(texts: &[String], scores: &[f64]) -> Aggregate {
    let words: Vec<WordDetail> = texts
        .iter()
        .zip(scores)
        .map(|(text, score)| WordDetail {
            text: text.clone(),
            confidence: *score,
        })
        .collect();

    let summary = words
        .iter()
        .map(|word| format!("{} ({:.2})", word.text, word.confidence))
        .collect::<Vec<_>>()
        .join(" ");

    let full_text = texts.join(" ").trim().to_string();

    let avg_confidence = if words.is_empty() {
        0.0
    } else {
        words.iter().map(|word| word.confidence).sum::<f64>() / words.len() as f64
    };

    Aggregate {
        words,
        summary,
        full_text,
        avg_confidence,
    }
}
