//! Configuration structures for the extraction service.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{JpidError, Result};

/// Maximum decoded image size accepted by default (10 MiB).
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Main configuration for jpid.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JpidConfig {
    /// HTTP server configuration.
    pub server: ServerConfig,

    /// OCR engine configuration.
    pub ocr: OcrConfig,

    /// Inbound image payload limits.
    pub input: InputConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,

    /// Port to listen on.
    pub port: u16,

    /// Wall-clock budget for one extraction request, in seconds.
    pub request_timeout_secs: u64,

    /// Send permissive CORS headers.
    pub allow_any_origin: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            request_timeout_secs: 30,
            allow_any_origin: true,
        }
    }
}

/// Tesseract invocation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Path or name of the tesseract binary.
    pub binary: PathBuf,

    /// Language models passed to `-l`.
    pub languages: String,

    /// OCR engine mode (`--oem`).
    pub oem: u8,

    /// Page segmentation mode (`--psm`).
    pub psm: u8,

    /// Input resolution hint (`--dpi`).
    pub dpi: u32,

    /// Characters tesseract may emit. Empty disables the whitelist.
    pub char_whitelist: String,

    /// Value for `TESSDATA_PREFIX`, if any.
    pub tessdata_prefix: Option<PathBuf>,

    /// Confidence assigned to fragments whose words report none.
    pub default_confidence: f32,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("tesseract"),
            languages: "jpn+eng".to_string(),
            oem: 1,
            psm: 3,
            dpi: 300,
            char_whitelist: String::new(),
            tessdata_prefix: Some(PathBuf::from("/usr/share/tesseract-ocr/5/tessdata/")),
            default_confidence: 0.8,
        }
    }
}

/// Inbound payload limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Largest decoded image accepted, in bytes.
    pub max_image_bytes: usize,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
        }
    }
}

impl JpidConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| JpidError::Config(e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| JpidError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary lookup.
    ///
    /// Unparseable numeric values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT").and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }
        if let Some(secs) = lookup("REQUEST_TIMEOUT_SECS").and_then(|s| s.parse().ok()) {
            self.server.request_timeout_secs = secs;
        }
        if let Some(bin) = lookup("TESSERACT_BIN") {
            self.ocr.binary = PathBuf::from(bin);
        }
        if let Some(prefix) = lookup("TESSDATA_PREFIX") {
            self.ocr.tessdata_prefix = Some(PathBuf::from(prefix));
        }
        if let Some(limit) = lookup("MAX_IMAGE_BYTES").and_then(|s| s.parse().ok()) {
            self.input.max_image_bytes = limit;
        }
    }
}
