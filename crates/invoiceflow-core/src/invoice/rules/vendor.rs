//! Vendor name extraction.

use regex::Regex;
use tracing::trace;

use super::patterns::{
    ID_SHAPED, NUMERIC_LINE, VENDOR_FORBIDDEN, VENDOR_FROM_BLOCKS, VENDOR_LABELED_BLOCKS,
};
use super::FieldExtractor;

/// Lines of the document inspected when no labeled block yields a name.
const HEADER_SCAN_LINES: usize = 20;

/// Vendor extractor.
#[derive(Debug, Default, Clone, Copy)]
pub struct VendorExtractor;

impl VendorExtractor {
    pub fn new() -> Self {
        Self
    }

    /// A line that could be a company name: not a number, not an ID, no label words.
    fn is_name_like(line: &str) -> bool {
        !NUMERIC_LINE.is_match(line) && !ID_SHAPED.is_match(line) && !VENDOR_FORBIDDEN.is_match(line)
    }

    fn first_name_like<'a>(lines: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
        lines
            .into_iter()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .find(|l| Self::is_name_like(l))
    }

    fn from_blocks(patterns: &[Regex], text: &str) -> Option<String> {
        patterns.iter().find_map(|pattern| {
            let caps = pattern.captures(text)?;
            let block = caps.get(1)?.as_str();
            let name = Self::first_name_like(block.lines());
            trace!("vendor block {:?} -> {:?}", pattern.as_str(), name);
            name.map(str::to_string)
        })
    }

    fn from_document_head(text: &str) -> Option<String> {
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();

        Self::first_name_like(lines.iter().take(HEADER_SCAN_LINES).copied())
            .or_else(|| lines.first().copied())
            .map(str::to_string)
    }
}

impl FieldExtractor for VendorExtractor {
    type Output = String;

    fn extract(&self, text: &str) -> Option<String> {
        Self::from_blocks(&VENDOR_LABELED_BLOCKS, text)
            .or_else(|| Self::from_blocks(&VENDOR_FROM_BLOCKS, text))
            .or_else(|| Self::from_document_head(text))
    }
}
