//! Japanese marker characters and label keywords found on identity documents.
//!
//! Lengths are counted in characters, never bytes.

/// Year marker (年).
pub const YEAR: char = '年';

/// Month marker (月).
pub const MONTH: char = '月';

/// Prefecture, city, ward, town and village markers.
pub const ADMIN_DIVISIONS: &[char] = &['都', '道', '府', '県', '市', '区', '町', '村'];

/// Block and lot markers (丁目, 番地).
pub const BLOCK_LOT: &[char] = &['丁', '目', '番', '地'];

/// Characters that never occur in a personal name.
pub const NON_NAME: &[char] = &['年', '月', '日', '都', '道', '府', '県', '市', '区', '町', '村'];

/// Birth date marker (生年月日, 生).
pub const BIRTH: &str = "生";

/// Issuance marker (交付).
pub const ISSUANCE: &str = "交付";

/// Expiry marker (有効).
pub const EXPIRY: &str = "有効";

/// Name label (氏名).
pub const NAME_LABEL: &str = "氏名";

/// Labels that may be captured in place of a name value.
pub const NAME_LABEL_KEYWORDS: &[&str] = &[
    "氏名", "番号", "免許", "運転免許", "個人番号", "住所", "生年月日", "性別",
];

/// Labels that may be captured in place of an address value.
pub const ADDRESS_LABEL_KEYWORDS: &[&str] = &["氏名", "生年月日"];

/// Number of characters in `text`.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// ASCII or full-width decimal digit.
pub fn is_digit(c: char) -> bool {
    c.is_ascii_digit() || ('０'..='９').contains(&c)
}

/// Whether `text` contains any digit.
pub fn has_digit(text: &str) -> bool {
    text.chars().any(is_digit)
}

/// Whether `text` carries both a year and a month marker.
pub fn has_year_and_month(text: &str) -> bool {
    text.contains(YEAR) && text.contains(MONTH)
}

/// Whether `text` carries an administrative-division marker.
pub fn has_admin_division(text: &str) -> bool {
    text.contains(ADMIN_DIVISIONS)
}

/// Whether `text` carries a block or lot marker.
pub fn has_block_lot(text: &str) -> bool {
    text.contains(BLOCK_LOT)
}

/// Whether `text` contains any of `keywords`.
pub fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}

/// Whether `text` begins with any of `keywords`.
pub fn starts_with_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.starts_with(k))
}

/// `text` with all whitespace removed.
pub fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_len_counts_characters() {
        assert_eq!(char_len("田中太郎"), 4);
        assert_eq!("田中太郎".len(), 12);
    }

    #[test]
    fn test_digits() {
        assert!(has_digit("第1号"));
        assert!(has_digit("第１号"));
        assert!(!has_digit("山田花子"));
    }

    #[test]
    fn test_markers() {
        assert!(has_year_and_month("平成5年12月25日"));
        assert!(!has_year_and_month("平成5年"));
        assert!(has_admin_division("東京都港区"));
        assert!(has_block_lot("1丁目2番地"));
        assert_eq!(strip_whitespace("氏 名\t"), "氏名");
    }
}
