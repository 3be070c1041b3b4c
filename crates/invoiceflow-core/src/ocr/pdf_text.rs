//! Backend reading the embedded text layer of PDFs.

use std::path::Path;

use tracing::info;

use super::{CapabilityType, OcrBackend};
use crate::error::OcrError;
use crate::models::raw::RawInput;
use crate::pdf::PdfExtractor;

/// Reads PDF text without OCR. Scanned PDFs with no text layer come back as
/// empty text, which the parser reports as an error.
#[derive(Debug, Clone)]
pub struct PdfTextBackend {
    max_pages: usize,
}

impl PdfTextBackend {
    pub fn new(max_pages: usize) -> Self {
        Self { max_pages }
    }
}

impl OcrBackend for PdfTextBackend {
    fn capability(&self) -> CapabilityType {
        CapabilityType::PdfText
    }

    fn extract(&self, source: &Path) -> Result<RawInput, OcrError> {
        let extractor = PdfExtractor::open(source)?;
        let text = extractor.extract_leading_pages(self.max_pages)?;

        info!("Extracted {} chars of PDF text from {}", text.len(), source.display());
        Ok(RawInput::Text(text))
    }
}
