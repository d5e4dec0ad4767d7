//! Normalization of fields captured from flat text.

use super::validators::{strip_id_separators, ID_NUMBER_LEN};

/// Regroup a 12-digit ID as `NNNN-NNNN-NNNN`.
///
/// Values that do not reduce to exactly 12 characters are returned as
/// trimmed input.
pub fn normalize_id_number(value: &str) -> String {
    let digits: Vec<char> = strip_id_separators(value).chars().collect();
    if digits.len() != ID_NUMBER_LEN {
        return value.trim().to_string();
    }

    let group = |range: std::ops::Range<usize>| digits[range].iter().collect::<String>();
    format!("{}-{}-{}", group(0..4), group(4..8), group(8..12))
}

/// Collapse line breaks, tabs and repeated spaces to single spaces.
pub fn normalize_address(value: &str) -> String {
    value
        .split(|c: char| c == ' ' || c == '\n' || c == '\r' || c == '\t')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Trim and, for unspaced names of 4+ characters, separate the presumed
/// family name (2 characters, or 3 when the name is longer than 5).
pub fn normalize_name(value: &str) -> String {
    let name = value.trim();
    if name.contains(char::is_whitespace) {
        return name.to_string();
    }

    let chars: Vec<char> = name.chars().collect();
    if chars.len() < 4 {
        return name.to_string();
    }

    let family_end = if chars.len() > 5 { 3 } else { 2 };
    let family: String = chars[..family_end].iter().collect();
    let given: String = chars[family_end..].iter().collect();
    format!("{} {}", family, given)
}

/// Map written-out or abbreviated gender tokens to 男 or 女.
///
/// Unknown tokens are returned trimmed and left for validation to reject.
pub fn normalize_gender(value: &str) -> String {
    match value.trim() {
        "男" | "男性" => "男".to_string(),
        "女" | "女性" => "女".to_string(),
        other => other.to_string(),
    }
}
