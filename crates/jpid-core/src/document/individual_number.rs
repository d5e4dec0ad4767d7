//! Japanese individual number card (マイナンバーカード).

use std::sync::Arc;

use crate::models::document::{fields, DocumentType, FieldMap};
use crate::ocr::OcrBackend;

use super::pipeline::{self, FieldRules};
use super::rules::validators::{is_valid_id_number, ID_NUMBER_LEN};
use super::rules::PatternTable;
use super::{DocumentParser, Result};

/// Label printed next to the individual number.
const NUMBER_LABEL: &str = "個人番号";

/// Parser for individual number cards.
pub struct IndividualNumberCardParser {
    backend: Arc<dyn OcrBackend>,
    patterns: PatternTable,
}

impl IndividualNumberCardParser {
    pub fn new(backend: Arc<dyn OcrBackend>) -> Result<Self> {
        Ok(Self {
            backend,
            patterns: PatternTable::individual_number_card()?,
        })
    }
}

impl FieldRules for IndividualNumberCardParser {
    fn document_type(&self) -> DocumentType {
        DocumentType::IndividualNumberCardJp
    }

    fn patterns(&self) -> &PatternTable {
        &self.patterns
    }

    /// The card prints its expiry without a marker next to the date.
    fn undated_field(&self) -> &'static str {
        fields::EXPIRY_DATE
    }

    fn accept_number(&self, text: &str) -> Option<String> {
        let number = text.replace(NUMBER_LABEL, "");
        let number = number.trim();

        is_valid_id_number(number, ID_NUMBER_LEN).then(|| number.to_string())
    }
}

impl DocumentParser for IndividualNumberCardParser {
    fn document_type(&self) -> DocumentType {
        DocumentType::IndividualNumberCardJp
    }

    fn parse(&self, image: &[u8]) -> Result<FieldMap> {
        pipeline::run(self, self.backend.as_ref(), image)
    }

    fn parse_text(&self, text: &str) -> Result<FieldMap> {
        pipeline::fallback_fields(self, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::{FragmentCategory, RecordedOcrBackend, RecordedOutput, TextFragment};
    use pretty_assertions::assert_eq;

    const CARD_TEXT: &str = "氏名 山田 花子\n住所 大阪府大阪市\n個人番号 123456789012";

    fn parser(output: RecordedOutput) -> (IndividualNumberCardParser, Arc<RecordedOcrBackend>) {
        let backend = Arc::new(RecordedOcrBackend::new(output));
        let parser = IndividualNumberCardParser::new(backend.clone()).unwrap();
        (parser, backend)
    }

    fn expected_card_fields() -> FieldMap {
        [
            ("name", "山田 花子"),
            ("address", "大阪府大阪市"),
            ("individual_number", "1234-5678-9012"),
            ("municipality", "大阪府大阪市"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    #[test]
    fn test_parse_text_regroups_number() {
        let (parser, _) = parser(RecordedOutput::default());
        assert_eq!(parser.parse_text(CARD_TEXT).unwrap(), expected_card_fields());
    }

    #[test]
    fn test_region_failure_uses_flat_text() {
        let (parser, backend) = parser(RecordedOutput::text(CARD_TEXT));

        assert_eq!(parser.parse(b"image").unwrap(), expected_card_fields());
        assert_eq!(backend.region_requests(), 1);
        assert_eq!(backend.text_requests(), 1);
        assert_eq!(backend.releases(), 1);
    }

    #[test]
    fn test_region_stage() {
        let (parser, backend) = parser(RecordedOutput::regions(vec![
            TextFragment::new("個人番号", FragmentCategory::Other),
            TextFragment::new("123456789012", FragmentCategory::Number),
            TextFragment::new("山田花子", FragmentCategory::Name),
            TextFragment::new("平成5年12月25日生", FragmentCategory::Date),
            TextFragment::new("2030年12月25日まで", FragmentCategory::Date),
        ]));

        let data = parser.parse(b"image").unwrap();
        assert_eq!(data["individual_number"], "123456789012");
        assert_eq!(data["name"], "山田花子");
        assert_eq!(data["birth_date"], "平成5年12月25日生");
        assert_eq!(data["expiry_date"], "2030年12月25日まで");
        assert_eq!(backend.text_requests(), 0);
    }

    #[test]
    fn test_short_number_excluded_from_regions() {
        let (parser, _) = parser(RecordedOutput::regions(vec![
            TextFragment::new("山田花子", FragmentCategory::Name),
            TextFragment::new("12345678901", FragmentCategory::Number),
        ]));

        let data = parser.parse(b"image").unwrap();
        assert!(!data.contains_key("individual_number"));
    }

    #[test]
    fn test_gender_normalized() {
        let (parser, _) = parser(RecordedOutput::default());

        let data = parser.parse_text("氏名 山田 花子\n性別 女性").unwrap();
        assert_eq!(data["gender"], "女");
    }

    #[test]
    fn test_alternate_number_pattern() {
        let (parser, _) = parser(RecordedOutput::default());

        let data = parser.parse_text("氏名 山田 花子\n1234-5678-9012").unwrap();
        assert_eq!(data["individual_number"], "1234-5678-9012");
    }

    #[test]
    fn test_full_width_number_folded() {
        let (parser, _) = parser(RecordedOutput::default());

        let data = parser
            .parse_text("氏名 山田 花子\n個人番号 １２３４５６７８９０１２")
            .unwrap();
        assert_eq!(data["individual_number"], "1234-5678-9012");
    }

    #[test]
    fn test_missing_name_fails() {
        let (parser, _) = parser(RecordedOutput::default());

        let err = parser.parse_text("個人番号 123456789012").unwrap_err();
        assert_eq!(err.field(), Some("name"));
    }
}
