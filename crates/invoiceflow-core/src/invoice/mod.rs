//! Invoice field extraction module.

mod parser;
pub mod registry;
pub mod rules;

pub use parser::{HeuristicParser, EMPTY_TABLE_ERROR, NO_TEXT_ERROR};
pub use registry::{ParserMeta, ParserRegistry};

use crate::models::invoice::ParsedInvoice;
use crate::models::raw::RawInput;

/// Trait for invoice parsers.
///
/// Parsers never fail outright: problems are reported through
/// [`ParsedInvoice::error`].
pub trait InvoiceParser: Send + Sync {
    /// Stable registration name.
    fn name(&self) -> &str;

    /// Parse raw OCR output into invoice fields.
    fn parse(&self, input: &RawInput) -> ParsedInvoice;

    /// Parse already-recognized text.
    fn parse_text(&self, text: &str) -> ParsedInvoice {
        self.parse(&RawInput::Text(text.to_string()))
    }
}
