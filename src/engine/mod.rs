//! OCR engine boundary
//!
//! The engine is a black box: given an image path it returns zero or more
//! per-page records carrying parallel `rec_texts`, `rec_scores`, and
//! `rec_polys` sequences. Two backends are supported:
//! - native: in-process PP-OCR models, producing typed records
//! - worker: an external process emitting JSON, producing mapped records

mod native;
mod worker;

use std::path::Path;

use anyhow::Result;
use serde_json::{Map, Value};

use crate::config::EngineConfig;

pub use native::NativeEngine;
pub use worker::WorkerEngine;

/// Engine backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineBackend {
    /// In-process PP-OCR models
    #[default]
    Native,
    /// External worker process emitting JSON on stdout
    Worker,
}

/// A 4-point text region in image pixel coordinates.
pub type Polygon = Vec<(f32, f32)>;

/// One page of engine output, polymorphic over the two shapes engines emit.
///
/// Any of the three fields may be absent in either shape; absence means
/// "no data", never an error.
#[derive(Debug, Clone)]
pub enum PageRecord {
    /// Keyed access: a loose JSON object (worker backend, newer engine builds)
    Mapped(Map<String, Value>),
    /// Field access: a typed page (native backend, older bindings)
    Typed(TypedPage),
}

/// The typed page shape.
#[derive(Debug, Clone, Default)]
pub struct TypedPage {
    pub rec_texts: Option<Vec<String>>,
    pub rec_scores: Option<Vec<f64>>,
    pub rec_polys: Option<Vec<Polygon>>,
}

/// The one operation the pipeline needs from an engine.
pub trait RecognitionEngine {
    /// Recognize text in the image at `image_path`, returning per-page
    /// records. An empty vector means the engine found nothing.
    fn recognize(&mut self, image_path: &Path) -> Result<Vec<PageRecord>>;
}

/// Construct the configured engine backend. Model loading happens here,
/// once per process.
pub fn create_engine(config: &EngineConfig) -> Result<Box<dyn RecognitionEngine>> {
    match config.backend {
        EngineBackend::Native => Ok(Box::new(NativeEngine::new(config)?)),
        EngineBackend::Worker => Ok(Box::new(WorkerEngine::new(config))),
    }
}
