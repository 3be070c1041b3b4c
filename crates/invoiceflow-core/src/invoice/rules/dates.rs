//! Invoice date extraction.

use regex::Regex;

use super::patterns::{DATE_DMY, DATE_MONTH_NAME, DATE_YMD};
use super::FieldExtractor;

fn date_patterns() -> [&'static Regex; 3] {
    [&*DATE_YMD, &*DATE_DMY, &*DATE_MONTH_NAME]
}

/// Whether the text contains anything shaped like a date.
pub fn looks_like_date(text: &str) -> bool {
    date_patterns().iter().any(|p| p.is_match(text))
}

/// Date extractor.
///
/// Patterns are tried in a fixed order (`YYYY-MM-DD`, `D/M/YYYY`,
/// `Month D, YYYY`); the first match of the first pattern that matches
/// anywhere is returned verbatim. No calendar validation happens here.
#[derive(Debug, Default, Clone, Copy)]
pub struct DateExtractor;

impl DateExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl FieldExtractor for DateExtractor {
    type Output = String;

    fn extract(&self, text: &str) -> Option<String> {
        date_patterns()
            .iter()
            .find_map(|p| p.find(text))
            .map(|m| m.as_str().to_string())
    }
}
