//! Recognition pipeline
//!
//! The orchestrator validates the input, calls the engine, and routes the
//! first page through extract -> annotate -> aggregate. Every failure along
//! the way is absorbed here and returned as data; this function never
//! propagates an error to its caller.

mod aggregate;
mod annotate;
mod extract;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{error, info, warn};

use crate::engine::{PageRecord, RecognitionEngine};
use crate::error::BridgeError;
use crate::result::{image_matrix, RecognitionResult};

pub use aggregate::{aggregate, Aggregate};
pub use annotate::{annotate, ImageSource, OutputMode};
pub use extract::{extract, Extracted};

/// Recognize text in the image at `image_path`.
///
/// Always returns a well-formed result: recognized data, the empty result
/// when the engine found nothing, or an embedded error on any failure.
pub fn recognize(
    engine: &mut dyn RecognitionEngine,
    image_path: &Path,
    mode: OutputMode,
) -> RecognitionResult {
    info!("start recognizing for image: {}", image_path.display());

    match run(engine, image_path, mode) {
        Ok(result) => result,
        Err(err) => {
            error!("error recognizing: {err}\n{err:?}");
            RecognitionResult::failure(&err)
        }
    }
}

fn run(
    engine: &mut dyn RecognitionEngine,
    image_path: &Path,
    mode: OutputMode,
) -> Result<RecognitionResult> {
    validate_input(image_path)?;

    let pages = engine
        .recognize(image_path)
        .context("OCR engine failed")?;
    log_page_diagnostics(&pages);

    // Only the first page is processed; the rest is diagnostic-logged above.
    let Some(first) = pages.first() else {
        warn!("engine returned no pages");
        return Ok(RecognitionResult::empty());
    };

    let extracted = extract(first);
    info!("recognized {} words", extracted.texts.len());

    if extracted.texts.is_empty() {
        warn!("no data extracted after processing");
        return Ok(RecognitionResult::empty());
    }

    let annotated = annotate(
        ImageSource::Path(image_path),
        &extracted.boxes,
        &extracted.texts,
        &extracted.scores,
        mode,
    )
    .context("annotation failed")?;

    let agg = aggregate(&extracted.texts, &extracted.scores);
    info!("recognizing end successfully");

    Ok(RecognitionResult {
        text: agg.full_text,
        confidence: agg.avg_confidence,
        word_count: agg.words.len(),
        words: agg.words.clone(),
        im_show: annotated.map(|image| image_matrix(&image)),
        tdata: agg.words,
        results_str: agg.summary,
        error: None,
        error_details: None,
    })
}

fn validate_input(image_path: &Path) -> Result<()> {
    if !image_path.exists() {
        return Err(BridgeError::NotFound(image_path.to_path_buf()).into());
    }
    let metadata = fs::metadata(image_path)
        .with_context(|| format!("failed to stat {}", image_path.display()))?;
    if metadata.len() == 0 {
        return Err(BridgeError::EmptyFile(image_path.to_path_buf()).into());
    }
    Ok(())
}

fn log_page_diagnostics(pages: &[PageRecord]) {
    if pages.is_empty() {
        warn!("result is empty");
        return;
    }
    for (idx, page) in pages.iter().enumerate() {
        let extracted = extract(page);
        info!("page {idx} rec_texts: {:?}", extracted.texts);
        info!("page {idx} rec_scores: {:?}", extracted.scores);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::TypedPage;
    use anyhow::anyhow;
    use image::RgbImage;
    use std::io::Write;

    /// Scripted engine for orchestrator tests.
    struct MockEngine {
        response: Result<Vec<PageRecord>, String>,
        calls: usize,
    }

    impl MockEngine {
        fn pages(pages: Vec<PageRecord>) -> Self {
            Self {
                response: Ok(pages),
                calls: 0,
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                response: Err(message.to_string()),
                calls: 0,
            }
        }
    }

    impl RecognitionEngine for MockEngine {
        fn recognize(&mut self, _image_path: &Path) -> Result<Vec<PageRecord>> {
            self.calls += 1;
            match &self.response {
                Ok(pages) => Ok(pages.clone()),
                Err(message) => Err(anyhow!("{message}")),
            }
        }
    }

    fn typed_page(texts: &[&str], scores: &[f64]) -> PageRecord {
        PageRecord::Typed(TypedPage {
            rec_texts: Some(texts.iter().map(|s| s.to_string()).collect()),
            rec_scores: Some(scores.to_vec()),
            rec_polys: Some(vec![
                vec![(1.0, 1.0), (5.0, 1.0), (5.0, 5.0), (1.0, 5.0)];
                texts.len()
            ]),
        })
    }

    /// Write a real decodable PNG so the annotator can run.
    fn sample_image(dir: &Path) -> std::path::PathBuf {
        let path = dir.join("sample.png");
        RgbImage::new(16, 16).save(&path).unwrap();
        path
    }

    #[test]
    fn test_missing_file_yields_error_result() {
        let mut engine = MockEngine::pages(vec![]);
        let result = recognize(
            &mut engine,
            Path::new("/nonexistent/path.png"),
            OutputMode::BoxesWithLabels,
        );
        assert_eq!(
            result.error.as_deref(),
            Some("image not found: /nonexistent/path.png")
        );
        assert_eq!(result.word_count, 0);
        assert!(result.im_show.is_none());
        // Validation fails before the engine is ever consulted
        assert_eq!(engine.calls, 0);
    }

    #[test]
    fn test_empty_file_yields_error_result() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.png");
        std::fs::File::create(&path).unwrap();

        let mut engine = MockEngine::pages(vec![]);
        let result = recognize(&mut engine, &path, OutputMode::None);
        let message = result.error.unwrap();
        assert!(message.starts_with("image file is empty:"), "{message}");
    }

    #[test]
    fn test_no_pages_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = sample_image(dir.path());

        let mut engine = MockEngine::pages(vec![]);
        let result = recognize(&mut engine, &path, OutputMode::BoxesWithLabels);
        assert!(result.error.is_none());
        assert_eq!(result.word_count, 0);
        assert_eq!(result.text, "");
        assert!(result.im_show.is_none());
    }

    #[test]
    fn test_page_without_texts_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = sample_image(dir.path());

        let mut engine = MockEngine::pages(vec![typed_page(&[], &[])]);
        let result = recognize(&mut engine, &path, OutputMode::BoxesWithLabels);
        assert!(result.error.is_none());
        assert_eq!(result.word_count, 0);
    }

    #[test]
    fn test_engine_failure_becomes_embedded_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = sample_image(dir.path());

        let mut engine = MockEngine::failing("model exploded");
        let result = recognize(&mut engine, &path, OutputMode::None);
        assert_eq!(result.error.as_deref(), Some("OCR engine failed"));
        assert!(result.error_details.unwrap().contains("model exploded"));
        assert_eq!(result.word_count, 0);
    }

    #[test]
    fn test_happy_path_assembles_contract() {
        let dir = tempfile::tempdir().unwrap();
        let path = sample_image(dir.path());

        let mut engine = MockEngine::pages(vec![typed_page(&["hello", "мир"], &[0.6, 0.8])]);
        let result = recognize(&mut engine, &path, OutputMode::BoxesOnly);

        assert!(result.error.is_none());
        assert_eq!(result.text, "hello мир");
        assert!((result.confidence - 0.7).abs() < 1e-9);
        assert_eq!(result.word_count, 2);
        assert_eq!(result.words, result.tdata);
        assert_eq!(result.results_str, "hello (0.60) мир (0.80)");
        // 16x16 annotated image comes back as a 16-row matrix
        let matrix = result.im_show.unwrap();
        assert_eq!(matrix.len(), 16);
        assert_eq!(matrix[0].len(), 16);
    }

    #[test]
    fn test_mode_outside_known_values_skips_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = sample_image(dir.path());

        let mut engine = MockEngine::pages(vec![typed_page(&["hello"], &[0.9])]);
        let result = recognize(&mut engine, &path, OutputMode::from(2));
        assert!(result.error.is_none());
        assert_eq!(result.word_count, 1);
        assert!(result.im_show.is_none());
    }

    #[test]
    fn test_only_first_page_is_processed() {
        let dir = tempfile::tempdir().unwrap();
        let path = sample_image(dir.path());

        let mut engine = MockEngine::pages(vec![
            typed_page(&["first"], &[0.5]),
            typed_page(&["second"], &[0.9]),
        ]);
        let result = recognize(&mut engine, &path, OutputMode::None);
        assert_eq!(result.text, "first");
        assert_eq!(result.word_count, 1);
    }

    #[test]
    fn test_undecodable_image_fails_only_when_rendering() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not-an-image.png");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"plain text, not pixels").unwrap();

        let mut engine = MockEngine::pages(vec![typed_page(&["x"], &[0.5])]);

        // Mode none never decodes, so the bogus bytes go unnoticed.
        let result = recognize(&mut engine, &path, OutputMode::None);
        assert!(result.error.is_none());

        // A drawing mode forces the decode and surfaces a rendering error.
        let result = recognize(&mut engine, &path, OutputMode::BoxesOnly);
        assert_eq!(result.error.as_deref(), Some("annotation failed"));
    }
}
