//! Document field extraction.
//!
//! One [`DocumentParser`] per [`DocumentType`], resolved through the
//! [`ParserFactory`].

mod drivers_license;
mod factory;
mod individual_number;
mod pipeline;
pub mod rules;
pub mod validation;

pub use drivers_license::DriversLicenseParser;
pub use factory::ParserFactory;
pub use individual_number::IndividualNumberCardParser;
pub use validation::validate;

use crate::error::ParseError;
use crate::models::document::{DocumentType, FieldMap};

/// Result type for parsing operations.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Extracts the fields of one document type.
pub trait DocumentParser: Send + Sync {
    /// Document type handled by this parser.
    fn document_type(&self) -> DocumentType;

    /// Extract fields from an image.
    ///
    /// Tries region-based extraction first and falls back to flat-text
    /// patterns. Only fallback failures are returned.
    fn parse(&self, image: &[u8]) -> Result<FieldMap>;

    /// Extract fields from already recognized flat text.
    fn parse_text(&self, text: &str) -> Result<FieldMap>;
}
