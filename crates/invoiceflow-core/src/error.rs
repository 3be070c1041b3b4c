//! Error types for the invoiceflow-core library.

use std::path::PathBuf;

use thiserror::Error;

use crate::ocr::CapabilityType;

/// Main error type for the invoiceflow library.
#[derive(Error, Debug)]
pub enum FlowError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// OCR backend error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Backend resolution or extraction error.
    #[error("dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    /// Parser registry error.
    #[error("parser registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Requested page does not exist.
    #[error("invalid page number: {0}")]
    InvalidPage(u32),

    /// No document has been loaded yet.
    #[error("no document loaded")]
    NotLoaded,
}

/// Errors raised by OCR backends, either while loading or while extracting.
#[derive(Error, Debug)]
pub enum OcrError {
    /// Failed to load OCR models.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// The backend's external dependency is missing.
    #[error("backend not available: {0}")]
    BackendNotAvailable(String),

    /// Text recognition failed.
    #[error("text recognition failed: {0}")]
    Recognition(String),

    /// The source could not be read as an image.
    #[error("invalid image: {0}")]
    InvalidImage(String),

    /// Image decoding error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// PDF error inside the pdf-text backend.
    #[error("{0}")]
    Pdf(#[from] PdfError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors surfaced by [`crate::ocr::Dispatcher`].
#[derive(Error, Debug)]
pub enum DispatchError {
    /// The source path does not exist.
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// No backend can be built for this capability type.
    #[error("no backend registered for capability {0}")]
    UnknownCapability(CapabilityType),

    /// Constructing the backend failed.
    #[error("failed to construct {capability} backend: {source}")]
    Construction {
        capability: CapabilityType,
        #[source]
        source: OcrError,
    },

    /// The backend failed while extracting.
    #[error("{capability} extraction failed: {message}")]
    Extraction {
        capability: CapabilityType,
        message: String,
    },
}

/// A capability name that does not match any [`CapabilityType`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown capability type '{0}'")]
pub struct ParseCapabilityError(pub String);

/// Errors from the parser registration table.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RegistryError {
    /// No parser registered under this name.
    #[error("unknown parser '{name}', available: {}", .available.join(", "))]
    UnknownParser { name: String, available: Vec<String> },

    /// The parser needs a credential the caller does not have.
    #[error("parser '{0}' requires an API credential")]
    MissingCredential(String),

    /// The parser is registered but cannot run in this build.
    #[error("parser '{name}' is unavailable: {reason}")]
    Unavailable { name: String, reason: String },
}

/// Errors from loading or saving configuration files.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for the invoiceflow library.
pub type Result<T> = std::result::Result<T, FlowError>;
