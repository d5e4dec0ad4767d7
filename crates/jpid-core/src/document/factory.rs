//! Registry of document parsers keyed by document type.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::error::ParseError;
use crate::models::document::DocumentType;
use crate::ocr::OcrBackend;

use super::{DocumentParser, DriversLicenseParser, IndividualNumberCardParser, Result};

/// Maps document types to their parsers.
///
/// Built once at startup and shared read-only afterwards.
#[derive(Default)]
pub struct ParserFactory {
    parsers: HashMap<DocumentType, Arc<dyn DocumentParser>>,
}

impl ParserFactory {
    /// Create an empty factory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a factory with every built-in parser registered against
    /// `backend`.
    pub fn with_builtin(backend: Arc<dyn OcrBackend>) -> Result<Self> {
        let mut factory = Self::new();
        factory.register(
            DocumentType::DriversLicenseJp,
            Arc::new(DriversLicenseParser::new(Arc::clone(&backend))?),
        )?;
        factory.register(
            DocumentType::IndividualNumberCardJp,
            Arc::new(IndividualNumberCardParser::new(backend)?),
        )?;
        Ok(factory)
    }

    /// Register `parser` for `doc_type`.
    ///
    /// A second registration for the same type is rejected.
    pub fn register(&mut self, doc_type: DocumentType, parser: Arc<dyn DocumentParser>) -> Result<()> {
        if self.parsers.contains_key(&doc_type) {
            return Err(ParseError::DuplicateRegistration(doc_type));
        }
        debug!("Registered parser for {}", doc_type);
        self.parsers.insert(doc_type, parser);
        Ok(())
    }

    /// Parser for `doc_type`.
    pub fn get(&self, doc_type: DocumentType) -> Result<Arc<dyn DocumentParser>> {
        self.parsers
            .get(&doc_type)
            .cloned()
            .ok_or_else(|| ParseError::UnsupportedDocumentType(doc_type.to_string()))
    }

    /// Parser for a wire identifier such as `drivers_license_jp`.
    pub fn get_parser(&self, identifier: &str) -> Result<Arc<dyn DocumentParser>> {
        let doc_type: DocumentType = identifier.parse()?;
        self.get(doc_type)
    }

    /// Whether `identifier` names a registered type.
    pub fn supports(&self, identifier: &str) -> bool {
        self.get_parser(identifier).is_ok()
    }

    /// Registered document types, sorted by identifier.
    pub fn list_supported_types(&self) -> Vec<DocumentType> {
        let mut types: Vec<DocumentType> = self.parsers.keys().copied().collect();
        types.sort_by_key(|t| t.as_str());
        types
    }
}
