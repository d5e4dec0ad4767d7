//! Two-stage extraction shared by the document parsers.
//!
//! The region stage works on categorized fragments; the fallback stage on a
//! flat text block. The stages never share data: a region result is either
//! returned whole or discarded.

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::error::ParseError;
use crate::models::document::{fields, DocumentType, FieldMap};
use crate::ocr::{EngineHandle, FragmentCategory, OcrBackend, TextFragment};

use super::rules::markers::{BIRTH, EXPIRY, ISSUANCE};
use super::rules::normalize::{normalize_address, normalize_gender, normalize_id_number, normalize_name};
use super::rules::{
    extract_municipality, extract_name, is_valid_address, is_valid_date, is_valid_name,
    PatternTable,
};
use super::validation::validate;

/// Document-specific rules plugged into the shared stages.
pub(crate) trait FieldRules {
    fn document_type(&self) -> DocumentType;

    fn patterns(&self) -> &PatternTable;

    /// Date field claimed by dates carrying no birth, issuance or expiry marker.
    fn undated_field(&self) -> &'static str;

    /// Label-free ID value if `text` is an acceptable document number.
    fn accept_number(&self, text: &str) -> Option<String>;
}

/// Date field a date fragment belongs to.
pub(crate) fn date_field<R: FieldRules + ?Sized>(rules: &R, text: &str) -> &'static str {
    if text.contains(BIRTH) {
        fields::BIRTH_DATE
    } else if text.contains(ISSUANCE) {
        fields::ISSUE_DATE
    } else if text.contains(EXPIRY) {
        fields::EXPIRY_DATE
    } else {
        rules.undated_field()
    }
}

/// Store `value` under `field` unless an earlier fragment claimed it.
fn claim(data: &mut FieldMap, field: &str, value: String) {
    if !data.contains_key(field) {
        data.insert(field.to_string(), value);
    }
}

/// Build a field map from categorized fragments.
///
/// Per-category dispatch keeps the first valid fragment for every field.
/// The municipality and name passes run afterwards, in that order.
pub(crate) fn region_fields<R: FieldRules + ?Sized>(rules: &R, fragments: &[TextFragment]) -> FieldMap {
    let mut data = FieldMap::new();

    for fragment in fragments {
        let text = fragment.text.trim();
        match fragment.category {
            FragmentCategory::Name => {
                if is_valid_name(text) {
                    claim(&mut data, fields::NAME, text.to_string());
                }
            }
            FragmentCategory::Address => {
                if is_valid_address(text) {
                    claim(&mut data, fields::ADDRESS, text.to_string());
                }
            }
            FragmentCategory::Date => {
                if is_valid_date(text) {
                    claim(&mut data, date_field(rules, text), text.to_string());
                }
            }
            FragmentCategory::Number => {
                if let Some(number) = rules.accept_number(text) {
                    claim(&mut data, rules.document_type().id_field(), number);
                }
            }
            FragmentCategory::Other => {}
        }
    }

    if let Some(municipality) = extract_municipality(fragments) {
        data.insert(fields::MUNICIPALITY.to_string(), municipality);
    }

    if let Some(name) = extract_name(fragments) {
        data.insert(fields::NAME.to_string(), name);
    }

    data
}

/// Normalize a fallback-derived field map in place.
pub(crate) fn normalize_fields(doc_type: DocumentType, data: &mut FieldMap) {
    if let Some(value) = data.get_mut(doc_type.id_field()) {
        *value = normalize_id_number(value);
    }
    if let Some(value) = data.get_mut(fields::ADDRESS) {
        *value = normalize_address(value);
    }
    if let Some(value) = data.get_mut(fields::NAME) {
        *value = normalize_name(value);
    }
    if doc_type.has_gender() {
        if let Some(value) = data.get_mut(fields::GENDER) {
            *value = normalize_gender(value);
        }
    }
}

/// Fallback stage: pattern extraction, normalization, validation.
pub(crate) fn fallback_fields<R: FieldRules + ?Sized>(rules: &R, text: &str) -> Result<FieldMap, ParseError> {
    let mut data = rules.patterns().extract(text);
    normalize_fields(rules.document_type(), &mut data);
    validate(rules.document_type(), &data)?;
    Ok(data)
}

/// Run both stages against one image with a single engine session.
pub(crate) fn run<R: FieldRules + ?Sized>(
    rules: &R,
    backend: &dyn OcrBackend,
    image: &[u8],
) -> Result<FieldMap, ParseError> {
    let doc_type = rules.document_type();
    let start = Instant::now();
    let mut engine = EngineHandle::acquire(backend)?;

    match engine.extract_regions(image) {
        Ok(fragments) => {
            debug!("{}: {} fragments from region extraction", doc_type, fragments.len());
            let data = region_fields(rules, &fragments);
            if data.is_empty() {
                debug!("{}: region stage produced no fields, falling back to full text", doc_type);
            } else {
                match validate(doc_type, &data) {
                    Ok(()) => {
                        info!(
                            "{}: extracted {} fields from regions in {}ms",
                            doc_type,
                            data.len(),
                            start.elapsed().as_millis()
                        );
                        return Ok(data);
                    }
                    Err(e) => warn!(
                        "{}: region-based extraction failed validation, falling back to full text: {}",
                        doc_type, e
                    ),
                }
            }
        }
        Err(e) => warn!(
            "{}: region extraction failed, falling back to full text: {}",
            doc_type, e
        ),
    }

    let text = engine.extract_text(image)?;
    debug!("{}: {} characters of flat text", doc_type, text.chars().count());

    let data = fallback_fields(rules, &text)?;
    info!(
        "{}: extracted {} fields from flat text in {}ms",
        doc_type,
        data.len(),
        start.elapsed().as_millis()
    );
    Ok(data)
}
