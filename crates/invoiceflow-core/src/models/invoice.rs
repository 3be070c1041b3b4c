//! Structured result of parsing one invoice.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Column names of a recognized cell record.
pub const CELL_COLUMNS: [&str; 6] = ["text", "x_min", "y_min", "x_max", "y_max", "score"];

/// Fields extracted from one invoice.
///
/// When `error` is set every other optional field is `None` and
/// `raw_text_length` is 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedInvoice {
    pub error: Option<String>,

    pub invoice_id: Option<String>,

    pub vendor_name: Option<String>,

    pub invoice_date: Option<String>,

    pub total_amount: Option<f64>,

    /// Length (in characters) of the text that was analyzed.
    pub raw_text_length: usize,

    /// Shape of a table-form input; only present for table inputs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<TableSummary>,
}

/// Summary of a table-form OCR result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSummary {
    pub num_cells: usize,
    pub num_rows: usize,
    pub columns: Vec<String>,
    pub mean_confidence: f32,
}

/// Outcome of [`ParsedInvoice::validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub checks: BTreeMap<String, bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<String, String>>,
}

impl ParsedInvoice {
    /// Build an error result with every field unset.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Check the extracted fields for presence and plausibility.
    pub fn validate(&self) -> ValidationResult {
        let mut checks = BTreeMap::new();
        let mut errors = BTreeMap::new();

        let mut check = |name: &str, passed: bool, message: &str| {
            checks.insert(name.to_string(), passed);
            if !passed {
                errors.insert(name.to_string(), message.to_string());
            }
        };

        check("has_invoice_id", self.invoice_id.is_some(), "invoice ID not found");
        check("has_vendor", self.vendor_name.is_some(), "vendor name not found");
        check("has_date", self.invoice_date.is_some(), "invoice date not found");
        check("has_total", self.total_amount.is_some(), "total amount not found");
        check(
            "total_positive",
            self.total_amount.is_some_and(|t| t > 0.0),
            "total amount is missing or not positive",
        );
        check(
            "date_parseable",
            self.invoice_date.as_deref().and_then(parse_invoice_date).is_some(),
            "invoice date is missing or not a calendar date",
        );

        ValidationResult {
            is_valid: errors.is_empty(),
            checks,
            errors: if errors.is_empty() { None } else { Some(errors) },
        }
    }
}

/// Parse a date string in one of the shapes the date extractor returns.
pub fn parse_invoice_date(raw: &str) -> Option<NaiveDate> {
    let numeric = raw.trim().replace('-', "/");
    for format in ["%Y/%m/%d", "%d/%m/%Y", "%m/%d/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(&numeric, format) {
            return Some(date);
        }
    }

    // Month-name form: "Jan 5, 2024", "January 05 2024", "Sep. 3, 2023"
    let words = raw
        .replace([',', '.'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    NaiveDate::parse_from_str(&words, "%B %d %Y").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_failed_result_has_no_fields() {
        let result = ParsedInvoice::failed("No text provided for parsing");
        assert_eq!(result.error.as_deref(), Some("No text provided for parsing"));
        assert_eq!(result.invoice_id, None);
        assert_eq!(result.total_amount, None);
        assert_eq!(result.raw_text_length, 0);
    }

    #[test]
    fn test_serialized_field_names() {
        let result = ParsedInvoice {
            invoice_id: Some("INV-42".into()),
            total_amount: Some(123.45),
            raw_text_length: 10,
            ..Default::default()
        };
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "error": null,
                "invoice_id": "INV-42",
                "vendor_name": null,
                "invoice_date": null,
                "total_amount": 123.45,
                "raw_text_length": 10,
            })
        );
    }

    #[test]
    fn test_parse_invoice_date() {
        assert_eq!(parse_invoice_date("2024-03-01"), NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(parse_invoice_date("15/01/2024"), NaiveDate::from_ymd_opt(2024, 1, 15));
        assert_eq!(parse_invoice_date("Jan 5, 2024"), NaiveDate::from_ymd_opt(2024, 1, 5));
        assert_eq!(parse_invoice_date("31/02/2024"), None);
    }

    #[test]
    fn test_validate() {
        let complete = ParsedInvoice {
            invoice_id: Some("INV-1".into()),
            vendor_name: Some("Acme".into()),
            invoice_date: Some("2024-03-01".into()),
            total_amount: Some(10.0),
            raw_text_length: 40,
            ..Default::default()
        };
        let result = complete.validate();
        assert!(result.is_valid);
        assert!(result.errors.is_none());

        let partial = ParsedInvoice {
            invoice_date: Some("31/02/2024".into()),
            ..complete
        };
        let result = partial.validate();
        assert!(!result.is_valid);
        assert_eq!(result.checks["date_parseable"], false);
        assert!(result.errors.unwrap().contains_key("date_parseable"));
    }
}
