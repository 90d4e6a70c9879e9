//! Annotator
//!
//! Draws detected polygons (and optionally text labels) onto a copy of the
//! input image. The caller's buffer is never mutated; a path source gets a
//! fresh decode. Mismatched sequence lengths truncate to the shortest.

use std::path::Path;
use std::sync::OnceLock;

use ab_glyph::{FontVec, PxScale};
use anyhow::{Context, Result};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_line_segment_mut, draw_text_mut};
use tracing::warn;

use crate::engine::Polygon;

const OUTLINE_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const LABEL_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const LABEL_SCALE: f32 = 16.0;
/// Vertical offset of a label above its polygon's first vertex.
const LABEL_OFFSET: f32 = 10.0;

/// Which annotation the pipeline renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Polygon outlines plus `"<text> (<score>)"` labels
    BoxesWithLabels,
    /// Polygon outlines only
    BoxesOnly,
    /// No image at all
    None,
}

impl From<i32> for OutputMode {
    fn from(mode: i32) -> Self {
        match mode {
            0 => OutputMode::BoxesWithLabels,
            1 => OutputMode::BoxesOnly,
            _ => OutputMode::None,
        }
    }
}

/// An image to annotate: either a path (decoded fresh) or an existing
/// buffer (cloned before drawing).
pub enum ImageSource<'a> {
    Path(&'a Path),
    Buffer(&'a RgbImage),
}

/// Render the annotation for `mode`, or `None` without touching the image
/// when no annotation is requested.
pub fn annotate(
    source: ImageSource,
    boxes: &[Polygon],
    texts: &[String],
    scores: &[f64],
    mode: OutputMode,
) -> Result<Option<RgbImage>> {
    if mode == OutputMode::None {
        return Ok(None);
    }

    let mut image = match source {
        ImageSource::Path(path) => image::open(path)
            .with_context(|| format!("failed to decode image at {}", path.display()))?
            .to_rgb8(),
        ImageSource::Buffer(buffer) => buffer.clone(),
    };

    for ((polygon, text), score) in boxes.iter().zip(texts).zip(scores) {
        draw_outline(&mut image, polygon);
        if mode == OutputMode::BoxesWithLabels {
            draw_label(&mut image, polygon, text, *score);
        }
    }

    Ok(Some(image))
}

/// Draw a closed polygon outline.
fn draw_outline(image: &mut RgbImage, polygon: &[(f32, f32)]) {
    if polygon.len() < 2 {
        return;
    }
    for i in 0..polygon.len() {
        let from = polygon[i];
        let to = polygon[(i + 1) % polygon.len()];
        draw_line_segment_mut(image, from, to, OUTLINE_COLOR);
    }
}

fn draw_label(image: &mut RgbImage, polygon: &[(f32, f32)], text: &str, score: f64) {
    let Some(font) = label_font() else {
        return;
    };
    let Some(&(x, y)) = polygon.first() else {
        return;
    };

    let label = format!("{text} ({score:.2})");
    draw_text_mut(
        image,
        LABEL_COLOR,
        x.max(0.0) as i32,
        (y - LABEL_OFFSET).max(0.0) as i32,
        PxScale::from(LABEL_SCALE),
        font,
        &label,
    );
}

static LABEL_FONT: OnceLock<Option<FontVec>> = OnceLock::new();

/// Lazily load a label font from well-known system locations. Labels are
/// best-effort: without a font the boxes are still drawn.
fn label_font() -> Option<&'static FontVec> {
    LABEL_FONT
        .get_or_init(|| {
            const CANDIDATES: &[&str] = &[
                "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
                "/usr/share/fonts/TTF/DejaVuSans.ttf",
                "/System/Library/Fonts/Supplemental/Arial Unicode.ttf",
                "C:\\Windows\\Fonts\\arial.ttf",
            ];
            for path in CANDIDATES {
                if let Ok(bytes) = std::fs::read(path) {
                    if let Ok(font) = FontVec::try_from_vec(bytes) {
                        return Some(font);
                    }
                }
            }
            warn!("no label font found; annotations will omit text labels");
            None
        })
        .as_ref()
}
