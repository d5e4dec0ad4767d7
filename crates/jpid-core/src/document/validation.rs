//! Field map validation shared by both extraction stages.

use crate::error::ParseError;
use crate::models::document::{fields, DocumentType, FieldMap};

use super::rules::validators::{is_valid_date, is_valid_id_number, ID_NUMBER_LEN};

/// Fields that must carry year and month markers when present.
const DATE_FIELDS: [&str; 3] = [fields::BIRTH_DATE, fields::ISSUE_DATE, fields::EXPIRY_DATE];

/// Check `data` against the rules of `doc_type`.
///
/// Stops at the first failing field: required fields first, then the
/// numeric ID, gender and date fields.
pub fn validate(doc_type: DocumentType, data: &FieldMap) -> Result<(), ParseError> {
    for field in doc_type.required_fields() {
        match data.get(*field) {
            Some(value) if !value.trim().is_empty() => {}
            _ => return Err(ParseError::missing(*field)),
        }
    }

    let id_field = doc_type.id_field();
    if let Some(value) = data.get(id_field) {
        if !is_valid_id_number(value, ID_NUMBER_LEN) {
            return Err(ParseError::invalid(
                id_field,
                format!("expected {} digits, got '{}'", ID_NUMBER_LEN, value),
            ));
        }
    }

    if doc_type.has_gender() {
        if let Some(value) = data.get(fields::GENDER) {
            if value != "男" && value != "女" {
                return Err(ParseError::invalid(
                    fields::GENDER,
                    format!("expected '男' or '女', got '{}'", value),
                ));
            }
        }
    }

    for field in DATE_FIELDS {
        if let Some(value) = data.get(field) {
            if !is_valid_date(value) {
                return Err(ParseError::invalid(
                    field,
                    format!("expected year and month markers, got '{}'", value),
                ));
            }
        }
    }

    Ok(())
}
