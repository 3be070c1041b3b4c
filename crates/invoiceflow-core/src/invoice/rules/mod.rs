//! Rule-based field extractors.

pub mod amounts;
pub mod dates;
pub mod invoice_id;
pub mod patterns;
pub mod vendor;

pub use amounts::{normalize_amount, TotalAmountExtractor};
pub use dates::{looks_like_date, DateExtractor};
pub use invoice_id::InvoiceIdExtractor;
pub use vendor::VendorExtractor;

/// Trait for field extractors.
///
/// Extractors are pure functions of their input text: a miss is `None`,
/// never an error.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;
}
