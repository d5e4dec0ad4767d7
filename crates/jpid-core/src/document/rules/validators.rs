//! Field plausibility predicates.

use super::markers::{
    char_len, contains_any, has_admin_division, has_block_lot, has_digit, has_year_and_month,
    starts_with_any, ADDRESS_LABEL_KEYWORDS, NAME_LABEL_KEYWORDS, NON_NAME,
};

/// Length of the numeric IDs on both supported documents.
pub const ID_NUMBER_LEN: usize = 12;

/// Whether `text` could be a personal name.
///
/// 2-20 characters, no digits, no date or address markers and no field
/// label captured in place of the value. A label is only recognized at the
/// start of the text, alone or followed by the value it introduces.
pub fn is_valid_name(text: &str) -> bool {
    let len = char_len(text);
    if !(2..=20).contains(&len) {
        return false;
    }
    if starts_with_any(text.trim_start(), NAME_LABEL_KEYWORDS) {
        return false;
    }
    !has_digit(text) && !text.contains(NON_NAME)
}

/// Whether `text` could be a residential address.
pub fn is_valid_address(text: &str) -> bool {
    if char_len(text) < 5 {
        return false;
    }
    if !has_admin_division(text) && !has_block_lot(text) {
        return false;
    }
    !contains_any(text, ADDRESS_LABEL_KEYWORDS)
}

/// Whether `text` carries a year and a month marker.
pub fn is_valid_date(text: &str) -> bool {
    has_year_and_month(text)
}

/// Whether `text` is exactly `expected_len` ASCII digits once whitespace
/// and hyphens are removed.
pub fn is_valid_id_number(text: &str, expected_len: usize) -> bool {
    let digits = strip_id_separators(text);
    digits.chars().count() == expected_len && digits.chars().all(|c| c.is_ascii_digit())
}

/// `text` without whitespace and hyphens, full-width digits folded to ASCII.
pub fn strip_id_separators(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != 'ー' && *c != '－')
        .map(fold_digit)
        .collect()
}

fn fold_digit(c: char) -> char {
    match c {
        '０'..='９' => char::from_u32(c as u32 - '０' as u32 + '0' as u32).unwrap_or(c),
        _ => c,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name() {
        assert!(is_valid_name("田中太郎"));
        assert!(is_valid_name("山田 花子"));
        assert!(is_valid_name("ヤマダ ハナコ"));

        assert!(!is_valid_name("田"));
        assert!(!is_valid_name("田中太郎2"));
        assert!(!is_valid_name("東京都港区"));
        assert!(!is_valid_name("平成5年"));
        assert!(!is_valid_name("氏名"));
        assert!(!is_valid_name("免許証番号"));
        assert!(!is_valid_name(&"あ".repeat(21)));
    }

    #[test]
    fn test_name_label_only_rejected_at_start() {
        assert!(!is_valid_name("番号"));
        assert!(!is_valid_name("氏名 山田花子"));
        assert!(!is_valid_name("性別女"));
        assert!(!is_valid_name("運転免許証"));

        assert!(is_valid_name("田中免許"));
        assert!(is_valid_name("山田番号"));
    }

    #[test]
    fn test_name_length_counts_characters() {
        // 20 kanji are 60 bytes.
        assert!(is_valid_name(&"山".repeat(20)));
    }

    #[test]
    fn test_address() {
        assert!(is_valid_address("東京都港区"));
        assert!(is_valid_address("港区六本木1丁目"));
        assert!(is_valid_address("六本木1丁目2番地"));

        assert!(!is_valid_address("港区"));
        assert!(!is_valid_address("六本木ヒルズ"));
        assert!(!is_valid_address("氏名 東京都港区"));
        assert!(!is_valid_address("生年月日 東京都港区"));
    }

    #[test]
    fn test_date() {
        assert!(is_valid_date("平成5年12月25日"));
        assert!(is_valid_date("1993年12月25日生"));
        assert!(!is_valid_date("1993/12/25"));
        assert!(!is_valid_date("平成5年"));
    }

    #[test]
    fn test_id_number() {
        assert!(is_valid_id_number("123456789012", ID_NUMBER_LEN));
        assert!(is_valid_id_number("1234-5678-9012", ID_NUMBER_LEN));
        assert!(is_valid_id_number("1234 5678 9012", ID_NUMBER_LEN));

        assert!(!is_valid_id_number("12345678901", ID_NUMBER_LEN));
        assert!(!is_valid_id_number("1234567890123", ID_NUMBER_LEN));
        assert!(!is_valid_id_number("12345678901A", ID_NUMBER_LEN));
        assert!(!is_valid_id_number("", ID_NUMBER_LEN));
    }

    #[test]
    fn test_id_number_full_width_digits() {
        assert!(is_valid_id_number("１２３４５６７８９０１２", ID_NUMBER_LEN));
        assert!(is_valid_id_number("１２３４－５６７８－９０１２", ID_NUMBER_LEN));
        assert_eq!(strip_id_separators("１２３４ 5678"), "12345678");
    }
}
