//! Japanese driver's license (運転免許証).

use std::sync::Arc;

use crate::models::document::{fields, DocumentType, FieldMap};
use crate::ocr::OcrBackend;

use super::pipeline::{self, FieldRules};
use super::rules::validators::{is_valid_id_number, ID_NUMBER_LEN};
use super::rules::PatternTable;
use super::{DocumentParser, Result};

/// Labels printed around the license number (免許証番号 第 … 号).
const NUMBER_LABELS: &[&str] = &["免許証番号", "第", "号"];

/// Parser for driver's licenses.
pub struct DriversLicenseParser {
    backend: Arc<dyn OcrBackend>,
    patterns: PatternTable,
}

impl DriversLicenseParser {
    pub fn new(backend: Arc<dyn OcrBackend>) -> Result<Self> {
        Ok(Self {
            backend,
            patterns: PatternTable::drivers_license()?,
        })
    }
}

impl FieldRules for DriversLicenseParser {
    fn document_type(&self) -> DocumentType {
        DocumentType::DriversLicenseJp
    }

    fn patterns(&self) -> &PatternTable {
        &self.patterns
    }

    fn undated_field(&self) -> &'static str {
        fields::BIRTH_DATE
    }

    fn accept_number(&self, text: &str) -> Option<String> {
        let number = NUMBER_LABELS
            .iter()
            .fold(text.to_string(), |acc, label| acc.replace(label, ""));
        let number = number.trim();

        if is_valid_id_number(number, ID_NUMBER_LEN) {
            Some(number.to_string())
        } else {
            None
        }
    }
}

impl DocumentParser for DriversLicenseParser {
    fn document_type(&self) -> DocumentType {
        DocumentType::DriversLicenseJp
    }

    fn parse(&self, image: &[u8]) -> Result<FieldMap> {
        pipeline::run(self, self.backend.as_ref(), image)
    }

    fn parse_text(&self, text: &str) -> Result<FieldMap> {
        pipeline::fallback_fields(self, text)
    }
}
