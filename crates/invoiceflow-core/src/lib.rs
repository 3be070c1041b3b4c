//! Core library for offline invoice parsing.
//!
//! This crate provides:
//! - OCR backend dispatch with a bounded, thread-safe instance cache
//! - PDF text extraction and image OCR backends
//! - Heuristic invoice field extraction (invoice ID, vendor, date, total)
//! - A parser registration table and an end-to-end pipeline

pub mod error;
pub mod models;
pub mod pdf;
pub mod ocr;
pub mod invoice;
pub mod pipeline;

pub use error::{
    ConfigError, DispatchError, FlowError, OcrError, ParseCapabilityError, PdfError, RegistryError,
    Result,
};
pub use models::config::FlowConfig;
pub use models::invoice::{ParsedInvoice, TableSummary, ValidationResult};
pub use models::raw::{BoundingBox, RawInput, TextCell};
pub use ocr::{
    BackendFactory, CapabilityHandle, CapabilityType, Dispatcher, ExtractorCache,
    ExtractorRegistry, NativeBackendFactory, OcrBackend,
};
pub use invoice::{HeuristicParser, InvoiceParser, ParserMeta, ParserRegistry};
pub use invoice::rules::normalize_amount;
pub use pipeline::InvoicePipeline;
