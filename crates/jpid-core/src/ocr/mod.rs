//! OCR engine interface and adapters.
//!
//! The document parsers only see [`OcrBackend`] and [`OcrEngine`]. An engine
//! is acquired once per parse call through [`EngineHandle`], which releases it
//! when dropped.

mod classifier;
mod recorded;
#[cfg(feature = "tesseract")]
mod tesseract;

pub use classifier::RegionClassifier;
pub use recorded::{RecordedOcrBackend, RecordedOutput};
#[cfg(feature = "tesseract")]
pub use tesseract::{parse_tsv, TesseractBackend};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::OcrError;

/// Coarse category assigned to a recognized fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FragmentCategory {
    Name,
    Address,
    Date,
    Number,
    Other,
}

impl FragmentCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FragmentCategory::Name => "name",
            FragmentCategory::Address => "address",
            FragmentCategory::Date => "date",
            FragmentCategory::Number => "number",
            FragmentCategory::Other => "other",
        }
    }
}

/// Axis-aligned pixel rectangle of a fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Position {
    /// Right edge.
    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    /// Bottom edge.
    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    /// Smallest rectangle covering both.
    pub fn union(&self, other: &Position) -> Position {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Position {
            x,
            y,
            width: (right - x).max(0) as u32,
            height: (bottom - y).max(0) as u32,
        }
    }
}

fn default_confidence() -> f32 {
    0.8
}

/// One recognized piece of text with its heuristic category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFragment {
    /// Recognized text.
    pub text: String,

    /// Heuristic category label.
    pub category: FragmentCategory,

    /// Location on the page, when the engine reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,

    /// Recognition confidence (0.0 - 1.0).
    #[serde(default = "default_confidence")]
    pub confidence: f32,
}

impl TextFragment {
    /// Create a fragment with an explicit category.
    pub fn new(text: impl Into<String>, category: FragmentCategory) -> Self {
        Self {
            text: text.into(),
            category,
            position: None,
            confidence: default_confidence(),
        }
    }

    /// Create a fragment labelled by the [`RegionClassifier`].
    pub fn classified(text: impl Into<String>) -> Self {
        let text = text.into();
        let category = RegionClassifier::new().classify(&text);
        Self::new(text, category)
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = confidence;
        self
    }
}

/// A live OCR engine session.
pub trait OcrEngine: Send {
    /// Recognize the image as one block of text.
    fn extract_text(&mut self, image: &[u8]) -> Result<String, OcrError>;

    /// Recognize the image as categorized, positioned fragments.
    fn extract_regions(&mut self, image: &[u8]) -> Result<Vec<TextFragment>, OcrError>;

    /// Release resources held by the session.
    fn release(&mut self) -> Result<(), OcrError> {
        Ok(())
    }
}

/// Source of OCR engine sessions.
pub trait OcrBackend: Send + Sync {
    /// Backend identifier for logs.
    fn name(&self) -> &'static str;

    /// Open a new engine session.
    fn acquire(&self) -> Result<Box<dyn OcrEngine>, OcrError>;
}

/// Scoped engine session. Released on drop.
pub struct EngineHandle {
    engine: Box<dyn OcrEngine>,
    backend: &'static str,
}

impl EngineHandle {
    /// Acquire a session from `backend`.
    pub fn acquire(backend: &dyn OcrBackend) -> Result<Self, OcrError> {
        let engine = backend.acquire()?;
        debug!("Acquired OCR engine from {}", backend.name());
        Ok(Self {
            engine,
            backend: backend.name(),
        })
    }

    pub fn extract_text(&mut self, image: &[u8]) -> Result<String, OcrError> {
        self.engine.extract_text(image)
    }

    pub fn extract_regions(&mut self, image: &[u8]) -> Result<Vec<TextFragment>, OcrError> {
        self.engine.extract_regions(image)
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        match self.engine.release() {
            Ok(()) => debug!("Released OCR engine from {}", self.backend),
            Err(e) => warn!("Failed to release OCR engine from {}: {}", self.backend, e),
        }
    }
}
