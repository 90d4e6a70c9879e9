//! Native PP-OCR backend
//!
//! Wraps `rust-paddle-ocr`: the detection model finds text rectangles, each
//! rectangle is cropped and fed to the recognition model. One image yields
//! one typed page record.

use std::path::Path;

use anyhow::{Context, Result};
use image::DynamicImage;
use imageproc::rect::Rect;
use rust_paddle_ocr::{Det, Rec};
use tracing::{debug, info};

use crate::config::EngineConfig;

use super::{PageRecord, Polygon, RecognitionEngine, TypedPage};

/// In-process OCR engine holding the loaded detection and recognition
/// models for the process lifetime.
pub struct NativeEngine {
    det: Det,
    rec: Rec,
}

impl NativeEngine {
    /// Load the models named in `config`.
    pub fn new(config: &EngineConfig) -> Result<Self> {
        info!("loading PP-OCR models");

        let det = Det::from_file(&config.detection_model)
            .context("failed to load detection model")?
            .with_merge_boxes(true)
            .with_merge_threshold(1);

        let rec = Rec::from_file(&config.recognition_model, &config.keys_path)
            .context("failed to load recognition model")?
            .with_min_score(0.6)
            .with_punct_min_score(0.1);

        info!("PP-OCR models loaded");
        Ok(Self { det, rec })
    }

    fn recognize_image(&mut self, image: &DynamicImage) -> Result<TypedPage> {
        let rects = self
            .det
            .find_text_rect(image)
            .context("text detection failed")?;
        debug!("detected {} text regions", rects.len());

        let mut texts = Vec::with_capacity(rects.len());
        let mut scores = Vec::with_capacity(rects.len());
        let mut polys = Vec::with_capacity(rects.len());

        for rect in rects {
            let crop = image.crop_imm(
                rect.left().max(0) as u32,
                rect.top().max(0) as u32,
                rect.width(),
                rect.height(),
            );
            let (text, score) = self
                .rec
                .predict_with_confidence(&crop)
                .context("text recognition failed")?;
            texts.push(text);
            scores.push(f64::from(score));
            polys.push(rect_corners(&rect));
        }

        Ok(TypedPage {
            rec_texts: Some(texts),
            rec_scores: Some(scores),
            rec_polys: Some(polys),
        })
    }
}

impl RecognitionEngine for NativeEngine {
    fn recognize(&mut self, image_path: &Path) -> Result<Vec<PageRecord>> {
        let image = image::open(image_path)
            .with_context(|| format!("failed to open image at {}", image_path.display()))?;
        let page = self.recognize_image(&image)?;
        Ok(vec![PageRecord::Typed(page)])
    }
}

/// Corners of a detection rectangle as a closed 4-point polygon,
/// clockwise from the top-left.
fn rect_corners(rect: &Rect) -> Polygon {
    let left = rect.left() as f32;
    let top = rect.top() as f32;
    let right = left + rect.width() as f32;
    let bottom = top + rect.height() as f32;
    vec![(left, top), (right, top), (right, bottom), (left, bottom)]
}
