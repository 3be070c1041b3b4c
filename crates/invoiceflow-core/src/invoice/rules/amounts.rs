//! Money normalization and total amount extraction.

use tracing::trace;

use super::patterns::{MONEY_TOKEN, SUMMARY_KEYWORD};
use super::FieldExtractor;

/// Turn a currency-like token into an amount.
///
/// Handles US (`1,234.56`), European (`1.234.567,89`) and comma-decimal
/// (`194,82`) forms. Returns `None` for tokens with three or more of either
/// separator, for mixed separators where a period follows the last comma
/// among several periods, and for anything that does not parse.
pub fn normalize_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .collect();

    let commas = cleaned.matches(',').count();
    let periods = cleaned.matches('.').count();

    if commas >= 3 || periods >= 3 {
        return None;
    }

    let last_comma = cleaned.rfind(',');
    let last_period = cleaned.rfind('.');

    // Ambiguous: several periods with one trailing after a comma
    if commas >= 1 && periods > 1 && last_period > last_comma {
        return None;
    }

    let normalized = if periods > 1 && commas == 1 && last_comma > last_period {
        // European: periods group thousands, comma is the decimal mark
        cleaned.replace('.', "").replace(',', ".")
    } else if commas > 1 {
        // US: commas group thousands
        cleaned.replace(',', "")
    } else if commas == 1 && periods == 0 {
        cleaned.replace(',', ".")
    } else if commas == 1 && periods == 1 {
        // One of each: the rightmost separator is the decimal mark
        if last_comma > last_period {
            cleaned.replace('.', "").replace(',', ".")
        } else {
            cleaned.replace(',', "")
        }
    } else {
        cleaned
    };

    normalized.parse::<f64>().ok()
}

/// Total amount extractor.
///
/// Takes everything from the first financial keyword (subtotal, total,
/// amount due, balance, summary...) to the end of the text and returns the
/// largest amount found there. A discount or tax line larger than the real
/// grand total will win; there is no fallback scan when no keyword exists.
#[derive(Debug, Default, Clone, Copy)]
pub struct TotalAmountExtractor;

impl TotalAmountExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Summary block: from the first financial keyword to the end of the text.
    pub fn summary_block<'a>(&self, text: &'a str) -> Option<&'a str> {
        SUMMARY_KEYWORD.find(text).map(|m| &text[m.start()..])
    }

    /// Every amount in the summary block, in document order.
    pub fn candidate_amounts(&self, text: &str) -> Vec<f64> {
        let Some(block) = self.summary_block(text) else {
            return Vec::new();
        };

        MONEY_TOKEN
            .find_iter(block)
            .filter_map(|m| {
                let token = m.as_str().trim_end_matches(['.', ',']);
                let amount = normalize_amount(token);
                trace!("summary token {:?} -> {:?}", m.as_str(), amount);
                amount
            })
            .collect()
    }
}

impl FieldExtractor for TotalAmountExtractor {
    type Output = f64;

    fn extract(&self, text: &str) -> Option<f64> {
        self.candidate_amounts(text).into_iter().reduce(f64::max)
    }
}
