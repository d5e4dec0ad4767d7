//! Core library for Japanese identity document OCR.
//!
//! This crate provides:
//! - OCR engine interface with Tesseract and recorded-output backends
//! - Heuristic region classification of recognized fragments
//! - Field extraction for driver's licenses and individual number cards
//!   (region analysis with a flat-text regex fallback)
//! - Base64 image payload decoding and service configuration

pub mod error;
pub mod models;
pub mod ocr;
pub mod document;
pub mod input;

pub use error::{InputError, JpidError, OcrError, ParseError, Result, ValidationReason};
pub use models::config::JpidConfig;
pub use models::document::{DocumentType, FieldMap, ParseResult};
pub use ocr::{
    EngineHandle, FragmentCategory, OcrBackend, OcrEngine, Position, RecordedOcrBackend,
    RecordedOutput, RegionClassifier, TextFragment,
};
#[cfg(feature = "tesseract")]
pub use ocr::TesseractBackend;
pub use document::{DocumentParser, ParserFactory};
pub use input::decode_image_payload;
