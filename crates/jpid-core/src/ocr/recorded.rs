//! Replays previously captured OCR output.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{JpidError, OcrError};

use super::{OcrBackend, OcrEngine, TextFragment};

/// Captured engine output for one image.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordedOutput {
    /// Flat recognized text.
    #[serde(default)]
    pub text: Option<String>,

    /// Categorized fragments.
    #[serde(default)]
    pub regions: Option<Vec<TextFragment>>,
}

impl RecordedOutput {
    /// Output with only flat text.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            regions: None,
        }
    }

    /// Output with only fragments.
    pub fn regions(regions: Vec<TextFragment>) -> Self {
        Self {
            text: None,
            regions: Some(regions),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Load fragments from a JSON array file.
    pub fn load_regions(path: &Path) -> crate::Result<Vec<TextFragment>> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| JpidError::Config(e.to_string()))
    }
}

#[derive(Debug, Default)]
struct Counters {
    acquisitions: AtomicUsize,
    releases: AtomicUsize,
    text_requests: AtomicUsize,
    region_requests: AtomicUsize,
}

/// Backend that serves a fixed [`RecordedOutput`] for every image.
///
/// Missing output surfaces as [`OcrError::Unavailable`].
#[derive(Debug, Clone)]
pub struct RecordedOcrBackend {
    output: Arc<RecordedOutput>,
    delay: Option<Duration>,
    counters: Arc<Counters>,
}

impl RecordedOcrBackend {
    pub fn new(output: RecordedOutput) -> Self {
        Self {
            output: Arc::new(output),
            delay: None,
            counters: Arc::new(Counters::default()),
        }
    }

    /// Sleep this long inside every extraction call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Sessions opened so far.
    pub fn acquisitions(&self) -> usize {
        self.counters.acquisitions.load(Ordering::SeqCst)
    }

    /// Sessions released so far.
    pub fn releases(&self) -> usize {
        self.counters.releases.load(Ordering::SeqCst)
    }

    /// Flat-text extraction calls so far.
    pub fn text_requests(&self) -> usize {
        self.counters.text_requests.load(Ordering::SeqCst)
    }

    /// Region extraction calls so far.
    pub fn region_requests(&self) -> usize {
        self.counters.region_requests.load(Ordering::SeqCst)
    }
}

impl OcrBackend for RecordedOcrBackend {
    fn name(&self) -> &'static str {
        "recorded"
    }

    fn acquire(&self) -> Result<Box<dyn OcrEngine>, OcrError> {
        self.counters.acquisitions.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(RecordedEngine {
            output: Arc::clone(&self.output),
            delay: self.delay,
            counters: Arc::clone(&self.counters),
        }))
    }
}

struct RecordedEngine {
    output: Arc<RecordedOutput>,
    delay: Option<Duration>,
    counters: Arc<Counters>,
}

impl RecordedEngine {
    fn pause(&self) {
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
    }
}

impl OcrEngine for RecordedEngine {
    fn extract_text(&mut self, image: &[u8]) -> Result<String, OcrError> {
        self.counters.text_requests.fetch_add(1, Ordering::SeqCst);
        if image.is_empty() {
            return Err(OcrError::EmptyImage);
        }
        self.pause();

        match self.output.text.as_deref().map(str::trim) {
            Some("") => Err(OcrError::NoText),
            Some(text) => Ok(text.to_string()),
            None => Err(OcrError::Unavailable("no recorded text".to_string())),
        }
    }

    fn extract_regions(&mut self, image: &[u8]) -> Result<Vec<TextFragment>, OcrError> {
        self.counters.region_requests.fetch_add(1, Ordering::SeqCst);
        if image.is_empty() {
            return Err(OcrError::EmptyImage);
        }
        self.pause();

        self.output
            .regions
            .clone()
            .ok_or_else(|| OcrError::Unavailable("no recorded regions".to_string()))
    }

    fn release(&mut self) -> Result<(), OcrError> {
        self.counters.releases.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
