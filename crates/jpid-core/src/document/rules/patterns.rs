//! Regex pattern tables for flat-text field extraction.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::trace;

use crate::error::ParseError;
use crate::models::document::{fields, FieldMap};

lazy_static! {
    // Driver's license (運転免許証)
    pub static ref LICENSE_NAME: Regex = Regex::new(
        r"氏\s*名[ \t\u{3000}]*[:：]?[ \t\u{3000}]*([^\s\d]+(?:[ \t\u{3000}]+[^\s\d]+)?)(?:\s|$)"
    ).unwrap();

    pub static ref LICENSE_ADDRESS: Regex = Regex::new(
        r"住\s*所\s*[:：]?\s*([^\r\n]+)"
    ).unwrap();

    pub static ref LICENSE_BIRTH_DATE: Regex = Regex::new(
        r"生年月日\s*[:：]?\s*([^\s]+)"
    ).unwrap();

    pub static ref LICENSE_NUMBER: Regex = Regex::new(
        r"免許証\s*番号\s*[:：]?\s*第?\s*(\d{4}[ \t\u{3000}-]*\d{4}[ \t\u{3000}-]*\d{4})"
    ).unwrap();

    pub static ref LICENSE_NUMBER_ALT: Regex = Regex::new(
        r"第\s*(\d{4}[ \t\u{3000}-]*\d{4}[ \t\u{3000}-]*\d{4})\s*号"
    ).unwrap();

    pub static ref LICENSE_CLASS: Regex = Regex::new(
        r"(?:免許\s*の\s*種類|種類)\s*[:：]?\s*([^\r\n]+)"
    ).unwrap();

    // Individual number card (マイナンバーカード)
    pub static ref CARD_NAME: Regex = Regex::new(
        r"氏\s*名\s*[:：]?\s*([^\r\n]+)"
    ).unwrap();

    pub static ref CARD_ADDRESS: Regex = Regex::new(
        r"住\s*所\s*[:：]?\s*([^\r\n]+)"
    ).unwrap();

    pub static ref CARD_BIRTH_DATE: Regex = Regex::new(
        r"生\s*年\s*月\s*日\s*[:：]?\s*([^\r\n]+)"
    ).unwrap();

    pub static ref CARD_GENDER: Regex = Regex::new(
        r"性\s*別\s*[:：]?\s*([男女]性?)"
    ).unwrap();

    pub static ref CARD_INDIVIDUAL_NUMBER: Regex = Regex::new(
        r"個人\s*番号\s*[:：]?\s*(\d{4}[ \t\u{3000}-]*\d{4}[ \t\u{3000}-]*\d{4})"
    ).unwrap();

    pub static ref CARD_INDIVIDUAL_NUMBER_ALT: Regex = Regex::new(
        r"(\d{4}-\d{4}-\d{4})"
    ).unwrap();

    pub static ref CARD_MUNICIPALITY: Regex = Regex::new(
        r"(?:住\s*所\s*[:：]?\s*)?([^都道府県\s]+[都道府県][^市区町村\s]+[市区町村])"
    ).unwrap();

    // Shared
    pub static ref ISSUE_DATE: Regex = Regex::new(
        r"交付\s*年\s*月\s*日\s*[:：]?\s*([^\r\n]+)"
    ).unwrap();

    pub static ref EXPIRY_DATE: Regex = Regex::new(
        r"有効\s*期\s*限\s*[:：]?\s*([^\r\n]+)"
    ).unwrap();

    /// Two kana/kanji runs separated by horizontal whitespace.
    pub static ref NAME_ALT: Regex = Regex::new(
        r"([ァ-ヴー一-龯ぁ-ゖ々]+[ \t\u{3000}]+[ァ-ヴー一-龯ぁ-ゖ々]+)"
    ).unwrap();

    /// Era (平成/昭和/令和, including 元年) or western calendar date.
    pub static ref BIRTH_DATE_ALT: Regex = Regex::new(
        r"((?:平成|昭和|令和)(?:\d{1,2}|元)年\d{1,2}月\d{1,2}日|\d{4}年\d{1,2}月\d{1,2}日)"
    ).unwrap();
}

/// A field regex with exactly one capturing group holding the value.
#[derive(Debug, Clone)]
pub struct ExtractionPattern {
    field: &'static str,
    alternate: bool,
    regex: Regex,
}

impl ExtractionPattern {
    /// Create a pattern for `field`.
    ///
    /// Fails if `regex` does not have exactly one capturing group.
    pub fn new(field: &'static str, regex: &Regex, alternate: bool) -> Result<Self, ParseError> {
        // captures_len counts the implicit whole-match group.
        let groups = regex.captures_len() - 1;
        if groups != 1 {
            let key = if alternate {
                format!("{}_alt", field)
            } else {
                field.to_string()
            };
            return Err(ParseError::InvalidPattern {
                key,
                reason: format!("expected exactly one capturing group, found {}", groups),
            });
        }

        Ok(Self {
            field,
            alternate,
            regex: regex.clone(),
        })
    }

    /// Field the captured value is stored under.
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Table key: the field name, suffixed with `_alt` for alternates.
    pub fn key(&self) -> String {
        if self.alternate {
            format!("{}_alt", self.field)
        } else {
            self.field.to_string()
        }
    }

    pub fn is_alternate(&self) -> bool {
        self.alternate
    }

    /// First match's trimmed capture, if non-empty.
    pub fn capture(&self, text: &str) -> Option<String> {
        let caps = self.regex.captures(text)?;
        let value = caps.get(1)?.as_str().trim();
        if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        }
    }
}

/// Canonical and alternate patterns for one document type.
///
/// Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct PatternTable {
    canonical: Vec<ExtractionPattern>,
    alternates: Vec<ExtractionPattern>,
}

impl PatternTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a canonical pattern.
    pub fn with_canonical(mut self, field: &'static str, regex: &Regex) -> Result<Self, ParseError> {
        self.canonical.push(ExtractionPattern::new(field, regex, false)?);
        Ok(self)
    }

    /// Add an alternate pattern, consulted only when `field` is still absent.
    pub fn with_alternate(mut self, field: &'static str, regex: &Regex) -> Result<Self, ParseError> {
        self.alternates.push(ExtractionPattern::new(field, regex, true)?);
        Ok(self)
    }

    /// Patterns for the driver's license.
    pub fn drivers_license() -> Result<Self, ParseError> {
        Self::new()
            .with_canonical(fields::NAME, &LICENSE_NAME)?
            .with_canonical(fields::ADDRESS, &LICENSE_ADDRESS)?
            .with_canonical(fields::BIRTH_DATE, &LICENSE_BIRTH_DATE)?
            .with_canonical(fields::LICENSE_NUMBER, &LICENSE_NUMBER)?
            .with_canonical(fields::ISSUE_DATE, &ISSUE_DATE)?
            .with_canonical(fields::EXPIRY_DATE, &EXPIRY_DATE)?
            .with_canonical(fields::LICENSE_CLASS, &LICENSE_CLASS)?
            .with_alternate(fields::NAME, &NAME_ALT)?
            .with_alternate(fields::BIRTH_DATE, &BIRTH_DATE_ALT)?
            .with_alternate(fields::LICENSE_NUMBER, &LICENSE_NUMBER_ALT)
    }

    /// Patterns for the individual number card.
    pub fn individual_number_card() -> Result<Self, ParseError> {
        Self::new()
            .with_canonical(fields::NAME, &CARD_NAME)?
            .with_canonical(fields::ADDRESS, &CARD_ADDRESS)?
            .with_canonical(fields::BIRTH_DATE, &CARD_BIRTH_DATE)?
            .with_canonical(fields::GENDER, &CARD_GENDER)?
            .with_canonical(fields::INDIVIDUAL_NUMBER, &CARD_INDIVIDUAL_NUMBER)?
            .with_canonical(fields::ISSUE_DATE, &ISSUE_DATE)?
            .with_canonical(fields::EXPIRY_DATE, &EXPIRY_DATE)?
            .with_canonical(fields::MUNICIPALITY, &CARD_MUNICIPALITY)?
            .with_alternate(fields::NAME, &NAME_ALT)?
            .with_alternate(fields::BIRTH_DATE, &BIRTH_DATE_ALT)?
            .with_alternate(fields::INDIVIDUAL_NUMBER, &CARD_INDIVIDUAL_NUMBER_ALT)
    }

    pub fn canonical(&self) -> &[ExtractionPattern] {
        &self.canonical
    }

    pub fn alternates(&self) -> &[ExtractionPattern] {
        &self.alternates
    }

    /// Alternate pattern for `field`, if any.
    pub fn alternate(&self, field: &str) -> Option<&ExtractionPattern> {
        self.alternates.iter().find(|p| p.field == field)
    }

    /// All table keys, canonical first.
    pub fn keys(&self) -> Vec<String> {
        self.canonical
            .iter()
            .chain(self.alternates.iter())
            .map(ExtractionPattern::key)
            .collect()
    }

    /// Apply every canonical pattern, then the alternates for fields that
    /// are still absent.
    pub fn extract(&self, text: &str) -> FieldMap {
        let mut data = FieldMap::new();

        for pattern in &self.canonical {
            if let Some(value) = pattern.capture(text) {
                trace!("Pattern '{}' matched {:?}", pattern.key(), value);
                data.insert(pattern.field.to_string(), value);
            }
        }

        for pattern in &self.alternates {
            if data.contains_key(pattern.field) {
                continue;
            }
            if let Some(value) = pattern.capture(text) {
                trace!("Pattern '{}' matched {:?}", pattern.key(), value);
                data.insert(pattern.field.to_string(), value);
            }
        }

        data
    }
}
