//! Enhancement passes over the full fragment list.

use crate::ocr::TextFragment;

use super::markers::{char_len, has_admin_division, NAME_LABEL};
use super::validators::is_valid_name;

/// First fragment carrying an administrative-division marker, trimmed,
/// 3-20 characters long.
pub fn extract_municipality(fragments: &[TextFragment]) -> Option<String> {
    fragments
        .iter()
        .map(|f| f.text.trim())
        .filter(|text| has_admin_division(text))
        .find(|text| (3..=20).contains(&char_len(text)))
        .map(str::to_string)
}

/// Name found next to a `氏名` label.
///
/// The fragment after the label is preferred; otherwise the label
/// fragment itself with the label removed. Returns `None` when no label
/// yields a valid name.
pub fn extract_name(fragments: &[TextFragment]) -> Option<String> {
    for (i, fragment) in fragments.iter().enumerate() {
        if !is_name_label(&fragment.text) {
            continue;
        }

        if let Some(next) = fragments.get(i + 1) {
            let name = strip_label(&next.text);
            if is_valid_name(&name) {
                return Some(name);
            }
        }

        let name = strip_label(&fragment.text);
        if is_valid_name(&name) {
            return Some(name);
        }
    }

    None
}

/// Whether `text` contains the name label, tolerating spaces inside it.
fn is_name_label(text: &str) -> bool {
    text.contains(NAME_LABEL) || remove_spaced_label(text).is_some()
}

/// `text` with the name label and surrounding whitespace removed.
fn strip_label(text: &str) -> String {
    let text = remove_spaced_label(text).unwrap_or_else(|| text.to_string());
    text.replace(NAME_LABEL, "").trim().to_string()
}

/// Remove a `氏 名` label written with inner whitespace.
fn remove_spaced_label(text: &str) -> Option<String> {
    let start = text.find('氏')?;
    let rest = &text[start + '氏'.len_utf8()..];
    let after_space = rest.trim_start();
    if after_space.len() == rest.len() || !after_space.starts_with('名') {
        return None;
    }

    let tail = &after_space['名'.len_utf8()..];
    Some(format!("{}{}", &text[..start], tail))
}
