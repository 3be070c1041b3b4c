//! Heuristic invoice parser running the rule-based extractors.

use tracing::debug;

use crate::models::config::ExtractionConfig;
use crate::models::invoice::{ParsedInvoice, TableSummary, CELL_COLUMNS};
use crate::models::raw::{group_rows, reading_order_text, RawInput, TextCell};

use super::rules::{
    DateExtractor, FieldExtractor, InvoiceIdExtractor, TotalAmountExtractor, VendorExtractor,
};
use super::InvoiceParser;

/// Error reported for empty text input.
pub const NO_TEXT_ERROR: &str = "No text provided for parsing";

/// Error reported for a table input without cells.
pub const EMPTY_TABLE_ERROR: &str = "Empty OCR table";

/// Rule-based parser for invoice ID, vendor, date and total.
#[derive(Debug, Clone, Default)]
pub struct HeuristicParser {
    invoice_id: InvoiceIdExtractor,
    vendor: VendorExtractor,
    date: DateExtractor,
    total: TotalAmountExtractor,
    /// Run the text extractors over table cells joined in reading order.
    table_text_extraction: bool,
}

impl HeuristicParser {
    /// Registration name.
    pub const NAME: &'static str = "heuristic";

    /// Create a parser with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new().with_table_text_extraction(config.table_text_extraction)
    }

    /// Set table text extraction.
    pub fn with_table_text_extraction(mut self, enabled: bool) -> Self {
        self.table_text_extraction = enabled;
        self
    }

    fn parse_str(&self, text: &str) -> ParsedInvoice {
        if text.is_empty() {
            return ParsedInvoice::failed(NO_TEXT_ERROR);
        }

        let result = ParsedInvoice {
            error: None,
            invoice_id: self.invoice_id.extract(text),
            vendor_name: self.vendor.extract(text),
            invoice_date: self.date.extract(text),
            total_amount: self.total.extract(text),
            raw_text_length: text.chars().count(),
            summary: None,
        };

        debug!(
            "Extracted invoice_id={:?} vendor={:?} date={:?} total={:?} from {} chars",
            result.invoice_id,
            result.vendor_name,
            result.invoice_date,
            result.total_amount,
            result.raw_text_length
        );

        result
    }

    fn parse_table(&self, cells: &[TextCell]) -> ParsedInvoice {
        if cells.is_empty() {
            return ParsedInvoice::failed(EMPTY_TABLE_ERROR);
        }

        let summary = summarize_table(cells);

        if self.table_text_extraction {
            let text = reading_order_text(cells);
            let mut result = self.parse_str(&text);
            if !result.is_error() {
                result.summary = Some(summary);
            }
            return result;
        }

        debug!(
            "Summarized table with {} cells in {} rows",
            summary.num_cells, summary.num_rows
        );

        ParsedInvoice {
            raw_text_length: cells.len(),
            summary: Some(summary),
            ..ParsedInvoice::default()
        }
    }
}

fn summarize_table(cells: &[TextCell]) -> TableSummary {
    let total_confidence: f32 = cells.iter().map(|c| c.confidence_score).sum();

    TableSummary {
        num_cells: cells.len(),
        num_rows: group_rows(cells).len(),
        columns: CELL_COLUMNS.iter().map(|c| c.to_string()).collect(),
        mean_confidence: total_confidence / cells.len() as f32,
    }
}

impl InvoiceParser for HeuristicParser {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn parse(&self, input: &RawInput) -> ParsedInvoice {
        match input {
            RawInput::Text(text) => self.parse_str(text),
            RawInput::Table(cells) => self.parse_table(cells),
        }
    }

    fn parse_text(&self, text: &str) -> ParsedInvoice {
        self.parse_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::raw::BoundingBox;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_text_is_error() {
        let parser = HeuristicParser::new();
        let result = parser.parse_text("");

        assert_eq!(
            result,
            ParsedInvoice {
                error: Some(NO_TEXT_ERROR.to_string()),
                ..ParsedInvoice::default()
            }
        );
    }

    #[test]
    fn test_parse_basic_invoice() {
        let parser = HeuristicParser::new();
        let text = "Invoice No: INV-42\nDate: 2024-03-01\nSeller: Acme Co\nTotal: $123.45";
        let result = parser.parse_text(text);

        assert_eq!(
            result,
            ParsedInvoice {
                error: None,
                invoice_id: Some("INV-42".to_string()),
                vendor_name: Some("Acme Co".to_string()),
                invoice_date: Some("2024-03-01".to_string()),
                total_amount: Some(123.45),
                raw_text_length: text.chars().count(),
                summary: None,
            }
        );
    }

    #[test]
    fn test_parse_european_invoice() {
        let text = r#"
            Northwind GmbH
            Hauptstraße 5, Berlin

            Invoice Number: RE-2024-0117
            Invoice date: 12/03/2024

            Item            Qty   Price
            Consulting      10    95,00

            Subtotal: 950,00 €
            VAT 19%: 180,50 €
            Grand Total: 1.130,50 €
        "#;

        let result = HeuristicParser::new().parse_text(text);

        assert!(result.error.is_none());
        assert_eq!(result.invoice_id.as_deref(), Some("RE-2024-0117"));
        assert_eq!(result.invoice_date.as_deref(), Some("12/03/2024"));
        assert_eq!(result.vendor_name.as_deref(), Some("Northwind GmbH"));
        assert_eq!(result.total_amount, Some(1130.5));
    }

    #[test]
    fn test_invoice_id_on_line_below_label() {
        let result = HeuristicParser::new()
            .parse_text("Invoice No:\nINV-2024-0098\nDate: 2024-02-01\nTotal: 50.00");

        assert_eq!(result.invoice_id.as_deref(), Some("INV-2024-0098"));
        assert_eq!(result.invoice_date.as_deref(), Some("2024-02-01"));
        assert_eq!(result.total_amount, Some(50.0));
    }

    #[test]
    fn test_partial_fields_are_not_errors() {
        let result = HeuristicParser::new().parse_text("hello world");

        assert!(result.error.is_none());
        assert_eq!(result.invoice_id, None);
        assert_eq!(result.total_amount, None);
        assert_eq!(result.vendor_name.as_deref(), Some("hello world"));
        assert_eq!(result.raw_text_length, 11);
    }

    fn table() -> Vec<TextCell> {
        vec![
            TextCell::new("Invoice No: INV-9", BoundingBox::new(10.0, 10.0, 200.0, 30.0), 0.9),
            TextCell::new("Seller: Acme Co", BoundingBox::new(10.0, 50.0, 200.0, 70.0), 0.8),
            TextCell::new("Total:", BoundingBox::new(10.0, 100.0, 60.0, 120.0), 0.7),
            TextCell::new("$40.00", BoundingBox::new(80.0, 101.0, 140.0, 121.0), 0.6),
        ]
    }

    #[test]
    fn test_table_is_summarized() {
        let result = HeuristicParser::new().parse(&RawInput::Table(table()));

        assert!(result.error.is_none());
        assert_eq!(result.invoice_id, None);
        assert_eq!(result.total_amount, None);
        assert_eq!(result.raw_text_length, 4);

        let summary = result.summary.unwrap();
        assert_eq!(summary.num_cells, 4);
        assert_eq!(summary.num_rows, 3);
        assert_eq!(summary.columns, CELL_COLUMNS.to_vec());
        assert!((summary.mean_confidence - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_table_text_extraction() {
        let parser = HeuristicParser::new().with_table_text_extraction(true);
        let result = parser.parse(&RawInput::Table(table()));

        assert_eq!(result.invoice_id.as_deref(), Some("INV-9"));
        assert_eq!(result.vendor_name.as_deref(), Some("Acme Co"));
        assert_eq!(result.total_amount, Some(40.0));
        assert!(result.summary.is_some());
    }

    #[test]
    fn test_empty_table_is_error() {
        let result = HeuristicParser::new().parse(&RawInput::Table(Vec::new()));
        assert_eq!(result.error.as_deref(), Some(EMPTY_TABLE_ERROR));
        assert_eq!(result.raw_text_length, 0);
    }
}
