//! OCR backend dispatch.
//!
//! Backends turn a document on disk into [`RawInput`]. Which backend runs is
//! decided by the file extension ([`ExtractorRegistry`]); backend instances
//! are expensive to build, so the [`Dispatcher`] keeps them in a bounded
//! [`ExtractorCache`] and reuses them across requests.

mod cache;
mod dispatcher;
#[cfg(feature = "native")]
mod image_ocr;
mod pdf_text;
mod registry;
mod tesseract;

pub use cache::{ExtractorCache, DEFAULT_CACHE_CAPACITY};
pub use dispatcher::{BackendFactory, CapabilityHandle, Dispatcher, NativeBackendFactory};
#[cfg(feature = "native")]
pub use image_ocr::ImageOcrBackend;
pub use pdf_text::PdfTextBackend;
pub use registry::ExtractorRegistry;
pub use tesseract::TesseractBackend;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{OcrError, ParseCapabilityError};
use crate::models::raw::RawInput;

/// Kind of extraction backend, independent of the concrete library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CapabilityType {
    /// Embedded text layer of a PDF.
    PdfText,
    /// Neural OCR over a photo or screenshot.
    ImageOcr,
    /// Classic OCR for scans and anything unrecognized.
    ScannedFallback,
}

impl CapabilityType {
    pub const ALL: [CapabilityType; 3] = [
        CapabilityType::PdfText,
        CapabilityType::ImageOcr,
        CapabilityType::ScannedFallback,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CapabilityType::PdfText => "pdf-text",
            CapabilityType::ImageOcr => "image-ocr",
            CapabilityType::ScannedFallback => "scanned-fallback",
        }
    }
}

impl std::str::FromStr for CapabilityType {
    type Err = ParseCapabilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pdf-text" | "pdf" => Ok(CapabilityType::PdfText),
            "image-ocr" | "image" => Ok(CapabilityType::ImageOcr),
            "scanned-fallback" | "scanned" => Ok(CapabilityType::ScannedFallback),
            _ => Err(ParseCapabilityError(s.to_string())),
        }
    }
}

impl std::fmt::Display for CapabilityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Trait for extraction backends.
pub trait OcrBackend: Send + Sync {
    /// The capability this backend provides.
    fn capability(&self) -> CapabilityType;

    /// Extract text or recognized cells from a document.
    fn extract(&self, source: &Path) -> Result<RawInput, OcrError>;
}
