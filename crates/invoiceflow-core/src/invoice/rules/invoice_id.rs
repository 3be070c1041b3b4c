//! Invoice number extraction.

use tracing::trace;

use super::dates::looks_like_date;
use super::patterns::{
    CURRENCY_SYMBOL, ID_LINE, INVOICE_HEADER_LINE, INVOICE_ID_MULTI_LINE, INVOICE_ID_PREFIXED,
    INVOICE_ID_SAME_LINE, SMALL_COUNT,
};
use super::FieldExtractor;

/// Label words that the patterns can capture in place of a real number.
const FORBIDDEN_TOKENS: [&str; 7] = [
    "invoice",
    "invoice number",
    "invoice no",
    "inv",
    "number",
    "no",
    "id",
];

/// Pieces of the word "invoice" left behind when `inv` matches first.
const INVOICE_FRAGMENTS: [&str; 3] = ["voice", "oice", "nvoice"];

/// How many non-empty lines after an "Invoice" header the fallback inspects.
const FALLBACK_LOOKAHEAD: usize = 4;

/// Invoice ID extractor.
#[derive(Debug, Default, Clone, Copy)]
pub struct InvoiceIdExtractor;

impl InvoiceIdExtractor {
    pub fn new() -> Self {
        Self
    }

    fn is_acceptable(candidate: &str) -> bool {
        let lower = candidate.to_lowercase();
        if FORBIDDEN_TOKENS.contains(&lower.as_str()) || INVOICE_FRAGMENTS.contains(&lower.as_str()) {
            return false;
        }
        candidate.chars().any(|c| c.is_ascii_digit())
    }

    /// Labeled patterns: same-line variants first, then label/value across a line break.
    fn from_patterns(&self, text: &str) -> Option<String> {
        INVOICE_ID_SAME_LINE
            .iter()
            .chain(INVOICE_ID_MULTI_LINE.iter())
            .flat_map(|pattern| pattern.captures_iter(text))
            .map(|caps| caps[1].to_string())
            .find(|candidate| {
                let accepted = Self::is_acceptable(candidate);
                trace!("invoice id candidate {:?} accepted={}", candidate, accepted);
                accepted
            })
    }

    /// `INV-...` tokens anywhere in the text.
    fn from_prefixed_token(&self, text: &str) -> Option<String> {
        INVOICE_ID_PREFIXED
            .captures(text)
            .map(|caps| caps[1].to_string())
    }

    /// Lines following an "Invoice ..." header that look like a bare identifier.
    fn from_following_lines(&self, text: &str) -> Option<String> {
        let lines: Vec<&str> = text.lines().map(str::trim).collect();

        for (i, line) in lines.iter().enumerate() {
            if !INVOICE_HEADER_LINE.is_match(line) {
                continue;
            }

            let following = lines[i + 1..]
                .iter()
                .filter(|l| !l.is_empty())
                .take(FALLBACK_LOOKAHEAD);

            for candidate in following {
                if looks_like_date(candidate)
                    || CURRENCY_SYMBOL.is_match(candidate)
                    || SMALL_COUNT.is_match(candidate)
                    || !candidate.chars().any(|c| c.is_ascii_digit())
                {
                    continue;
                }
                if ID_LINE.is_match(candidate) {
                    return Some(candidate.to_string());
                }
            }
        }

        None
    }
}

impl FieldExtractor for InvoiceIdExtractor {
    type Output = String;

    fn extract(&self, text: &str) -> Option<String> {
        self.from_patterns(text)
            .or_else(|| self.from_prefixed_token(text))
            .or_else(|| self.from_following_lines(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> Option<String> {
        InvoiceIdExtractor::new().extract(text)
    }

    #[test]
    fn test_labeled_invoice_number() {
        assert_eq!(extract("Invoice No: INV-42"), Some("INV-42".to_string()));
        assert_eq!(
            extract("Invoice Number: INV-2024-0098"),
            Some("INV-2024-0098".to_string())
        );
        assert_eq!(extract("INVOICE # 2024/117"), Some("2024/117".to_string()));
    }

    #[test]
    fn test_rejects_invoice_word_and_fragments() {
        assert_eq!(extract("INVOICE\nBill To: Jane Doe"), None);
        assert_eq!(extract("Invoice: Invoice"), None);
        assert!(!InvoiceIdExtractor::is_acceptable("oice"));
        assert!(!InvoiceIdExtractor::is_acceptable("NVOICE"));
        assert!(!InvoiceIdExtractor::is_acceptable("Number"));
    }

    #[test]
    fn test_skips_label_captures_without_digits() {
        let text = "Invoice Date: 2024-01-15\nInvoice No: A-1001";
        assert_eq!(extract(text), Some("A-1001".to_string()));
    }

    #[test]
    fn test_reference_and_id_labels() {
        assert_eq!(extract("Ref: PO-5521"), Some("PO-5521".to_string()));
        assert_eq!(extract("Customer ID: 889120"), Some("889120".to_string()));
    }

    #[test]
    fn test_label_and_value_on_separate_lines() {
        assert_eq!(extract("Invoice No.\nAB-20931"), Some("AB-20931".to_string()));
    }

    #[test]
    fn test_inv_prefixed_value_below_label() {
        assert_eq!(
            extract("Invoice No:\nINV-2024-0098"),
            Some("INV-2024-0098".to_string())
        );
        assert_eq!(
            extract("INVOICE\nINV-2024-0098"),
            Some("INV-2024-0098".to_string())
        );
        assert_eq!(extract("Invoice Number\nINV-7781"), Some("INV-7781".to_string()));
    }

    #[test]
    fn test_bare_inv_prefixed_line() {
        assert_eq!(extract("INV-2024-0098"), Some("INV-2024-0098".to_string()));
        assert_eq!(
            extract("Acme Ltd\nINV-2024-0098\nTotal: 10.00"),
            Some("INV-2024-0098".to_string())
        );
    }

    #[test]
    fn test_spaced_dash_separator() {
        assert_eq!(extract("Invoice - 55120"), Some("55120".to_string()));
    }

    #[test]
    fn test_fallback_skips_dates_amounts_and_counts() {
        let text = "TAX INVOICE\n\n12/03/2024\n$45.00\n3\nX7-99812\nThank you";
        assert_eq!(extract(text), Some("X7-99812".to_string()));
    }

    #[test]
    fn test_fallback_lookahead_is_bounded() {
        let text = "INVOICE\nAcme\nStreet 1\nCity\nCountry\nZX-5000";
        assert_eq!(extract(text), None);
    }
}
