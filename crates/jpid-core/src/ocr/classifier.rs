//! Heuristic category labelling for recognized fragments.

use tracing::trace;

use crate::document::rules::markers::{char_len, has_admin_division, has_digit, has_year_and_month};

use super::FragmentCategory;

/// Assigns a coarse category to fragment text.
///
/// Rules, first match wins:
/// 1. year and month markers → `date`
/// 2. administrative-division marker → `address`
/// 3. 2-10 characters without digits → `name`
/// 4. at least one digit and 4+ characters → `number`
/// 5. anything else → `other`
#[derive(Debug, Clone, Copy, Default)]
pub struct RegionClassifier;

impl RegionClassifier {
    /// Create a new region classifier.
    pub fn new() -> Self {
        Self
    }

    /// Classify fragment text.
    pub fn classify(&self, text: &str) -> FragmentCategory {
        let len = char_len(text);
        let digits = has_digit(text);

        let category = if has_year_and_month(text) {
            FragmentCategory::Date
        } else if has_admin_division(text) {
            FragmentCategory::Address
        } else if (2..=10).contains(&len) && !digits {
            FragmentCategory::Name
        } else if digits && len >= 4 {
            FragmentCategory::Number
        } else {
            FragmentCategory::Other
        };

        trace!("Classified {:?} as {}", text, category.as_str());
        category
    }
}
