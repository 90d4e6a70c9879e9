//! Bridge configuration
//!
//! Optional TOML file read at startup; every field has a sensible default so
//! the binary runs without any configuration present.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::engine::EngineBackend;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// OCR engine settings
    pub engine: EngineConfig,
}

/// OCR engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Which engine backend to construct
    pub backend: EngineBackend,
    /// Recognition language, passed to the worker backend. The native
    /// backend selects its language through the keys file instead.
    pub lang: String,
    /// Path to the detection model (native backend)
    pub detection_model: PathBuf,
    /// Path to the recognition model (native backend)
    pub recognition_model: PathBuf,
    /// Path to the charset/keys file (native backend)
    pub keys_path: PathBuf,
    /// Command invoked by the worker backend
    pub worker_command: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            backend: EngineBackend::default(),
            lang: "ru".to_string(),
            detection_model: PathBuf::from("models/PP-OCRv5_mobile_det.mnn"),
            recognition_model: PathBuf::from("models/PP-OCRv5_mobile_rec.mnn"),
            keys_path: PathBuf::from("models/ppocr_keys_v5.txt"),
            worker_command: PathBuf::from("paddleocr-worker"),
        }
    }
}

impl BridgeConfig {
    /// Load configuration from `path`, falling back to defaults when the
    /// file is absent or unreadable.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            if let Ok(config) = load_config(path) {
                info!("loaded configuration from {}", path.display());
                return config;
            }
        }
        info!("using default configuration");
        Self::default()
    }
}

/// Parse a TOML configuration file.
pub fn load_config(path: &Path) -> Result<BridgeConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    toml::from_str(&raw)
        .with_context(|| format!("failed to parse config file {}", path.display()))
}
