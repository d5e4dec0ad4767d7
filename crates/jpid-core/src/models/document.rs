//! Document types and the extracted field map.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Extracted fields keyed by wire name (`name`, `birth_date`, ...).
///
/// Ordered so that serialized output is stable.
pub type FieldMap = BTreeMap<String, String>;

/// Wire field names shared by the built-in document types.
pub mod fields {
    pub const NAME: &str = "name";
    pub const ADDRESS: &str = "address";
    pub const BIRTH_DATE: &str = "birth_date";
    pub const ISSUE_DATE: &str = "issue_date";
    pub const EXPIRY_DATE: &str = "expiry_date";
    pub const LICENSE_NUMBER: &str = "license_number";
    pub const LICENSE_CLASS: &str = "license_class";
    pub const INDIVIDUAL_NUMBER: &str = "individual_number";
    pub const GENDER: &str = "gender";
    pub const MUNICIPALITY: &str = "municipality";
}

/// Supported identity document types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DocumentType {
    /// Japanese driver's license (運転免許証).
    #[serde(rename = "drivers_license_jp")]
    DriversLicenseJp,
    /// Japanese individual number card (マイナンバーカード).
    #[serde(rename = "individual_number_card_jp")]
    IndividualNumberCardJp,
}

impl DocumentType {
    /// Every built-in document type.
    pub const ALL: [DocumentType; 2] = [
        DocumentType::DriversLicenseJp,
        DocumentType::IndividualNumberCardJp,
    ];

    /// Wire identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::DriversLicenseJp => "drivers_license_jp",
            DocumentType::IndividualNumberCardJp => "individual_number_card_jp",
        }
    }

    /// Fields that must be present and non-blank for a successful parse.
    pub fn required_fields(&self) -> &'static [&'static str] {
        match self {
            DocumentType::DriversLicenseJp => &[fields::NAME],
            DocumentType::IndividualNumberCardJp => &[fields::NAME],
        }
    }

    /// Field holding the document's 12-digit number.
    pub fn id_field(&self) -> &'static str {
        match self {
            DocumentType::DriversLicenseJp => fields::LICENSE_NUMBER,
            DocumentType::IndividualNumberCardJp => fields::INDIVIDUAL_NUMBER,
        }
    }

    /// Whether the document carries a gender field.
    pub fn has_gender(&self) -> bool {
        matches!(self, DocumentType::IndividualNumberCardJp)
    }

    /// Human-readable name.
    pub fn display_name(&self) -> &'static str {
        match self {
            DocumentType::DriversLicenseJp => "運転免許証",
            DocumentType::IndividualNumberCardJp => "マイナンバーカード",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DocumentType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ParseError::UnsupportedDocumentType(s.to_string()))
    }
}

/// The externally visible result of a successful parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResult {
    /// Document type that was processed.
    pub document_type: DocumentType,
    /// Extracted field data.
    pub data: FieldMap,
}
