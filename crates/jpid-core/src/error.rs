//! Error types for the jpid-core library.

use thiserror::Error;

use crate::models::document::DocumentType;

/// Main error type for the jpid library.
#[derive(Error, Debug)]
pub enum JpidError {
    /// OCR engine error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Document parsing error.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Inbound image payload error.
    #[error("input error: {0}")]
    Input(#[from] InputError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised by an OCR engine.
#[derive(Error, Debug)]
pub enum OcrError {
    /// The engine was handed no image bytes.
    #[error("cannot process empty image")]
    EmptyImage,

    /// No output is available from this engine.
    #[error("OCR engine unavailable: {0}")]
    Unavailable(String),

    /// The engine ran but failed.
    #[error("OCR processing failed: {0}")]
    Process(String),

    /// The engine produced no text.
    #[error("no text could be extracted from the image")]
    NoText,

    /// Temp file or pipe error around the engine invocation.
    #[error("OCR I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Why a field failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationReason {
    /// Required field is absent or blank.
    Missing,
    /// Field is present but malformed.
    InvalidFormat(String),
}

impl std::fmt::Display for ValidationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationReason::Missing => f.write_str("missing or empty"),
            ValidationReason::InvalidFormat(detail) => write!(f, "invalid format: {}", detail),
        }
    }
}

/// Errors related to document field extraction.
#[derive(Error, Debug)]
pub enum ParseError {
    /// Requested document type has no registered parser.
    #[error("unsupported document type: {0}")]
    UnsupportedDocumentType(String),

    /// Text or region extraction could not produce output.
    #[error("failed to extract text via OCR: {0}")]
    OcrFailure(#[from] OcrError),

    /// A required field is missing or a present field is malformed.
    #[error("validation failed for field '{field}': {reason}")]
    Validation {
        field: String,
        reason: ValidationReason,
    },

    /// A parser was registered twice for the same document type.
    #[error("document type already registered: {0}")]
    DuplicateRegistration(DocumentType),

    /// An extraction pattern does not have exactly one capturing group.
    #[error("invalid extraction pattern '{key}': {reason}")]
    InvalidPattern { key: String, reason: String },
}

impl ParseError {
    /// Build a missing-field validation error.
    pub fn missing(field: impl Into<String>) -> Self {
        ParseError::Validation {
            field: field.into(),
            reason: ValidationReason::Missing,
        }
    }

    /// Build an invalid-format validation error.
    pub fn invalid(field: impl Into<String>, detail: impl Into<String>) -> Self {
        ParseError::Validation {
            field: field.into(),
            reason: ValidationReason::InvalidFormat(detail.into()),
        }
    }

    /// Name of the offending field, for validation failures.
    pub fn field(&self) -> Option<&str> {
        match self {
            ParseError::Validation { field, .. } => Some(field),
            _ => None,
        }
    }
}

/// Errors related to the inbound base64 image payload.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    /// No image data was supplied.
    #[error("image field is required")]
    MissingImage,

    /// Payload is not valid standard base64.
    #[error("invalid base64 encoding")]
    InvalidBase64,

    /// Payload decoded to zero bytes.
    #[error("decoded image data is empty")]
    EmptyImage,

    /// Decoded payload exceeds the configured limit.
    #[error("image size exceeds maximum limit of {limit} bytes")]
    TooLarge { limit: usize },

    /// Decoded payload is neither PNG nor JPEG.
    #[error("unsupported image format, only PNG and JPEG are supported")]
    UnsupportedFormat,
}

/// Result type for the jpid library.
pub type Result<T> = std::result::Result<T, JpidError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_names_field() {
        let err = ParseError::missing("name");
        assert_eq!(err.field(), Some("name"));
        assert_eq!(
            err.to_string(),
            "validation failed for field 'name': missing or empty"
        );

        let err = ParseError::invalid("gender", "expected '男' or '女', got 'X'");
        assert!(err.to_string().contains("invalid format"));
    }

    #[test]
    fn test_input_error_messages() {
        assert_eq!(
            InputError::TooLarge { limit: 10 }.to_string(),
            "image size exceeds maximum limit of 10 bytes"
        );
        assert_eq!(InputError::InvalidBase64.to_string(), "invalid base64 encoding");
    }
}
