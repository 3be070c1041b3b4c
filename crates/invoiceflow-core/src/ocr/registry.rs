//! Static mapping from file extension to capability type.

use std::path::Path;

use super::CapabilityType;

const DEFAULT_MAPPINGS: [(&str, CapabilityType); 6] = [
    (".pdf", CapabilityType::PdfText),
    (".jpg", CapabilityType::ImageOcr),
    (".jpeg", CapabilityType::ImageOcr),
    (".png", CapabilityType::ImageOcr),
    (".tif", CapabilityType::ScannedFallback),
    (".tiff", CapabilityType::ScannedFallback),
];

/// Extension → capability table.
///
/// Lookups are case-insensitive and match the longest registered suffix of
/// the file name, so multi-part extensions can be registered. Anything
/// unmatched resolves to the default capability.
#[derive(Debug, Clone)]
pub struct ExtractorRegistry {
    mappings: Vec<(String, CapabilityType)>,
    default: CapabilityType,
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self {
            mappings: DEFAULT_MAPPINGS
                .iter()
                .map(|(ext, capability)| (ext.to_string(), *capability))
                .collect(),
            default: CapabilityType::ScannedFallback,
        }
    }
}

impl ExtractorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a mapping. The extension may omit the leading dot.
    pub fn with_mapping(mut self, extension: &str, capability: CapabilityType) -> Self {
        let extension = normalize_extension(extension);
        self.mappings.retain(|(ext, _)| *ext != extension);
        self.mappings.push((extension, capability));
        self
    }

    /// Capability used for unknown or missing extensions.
    pub fn default_capability(&self) -> CapabilityType {
        self.default
    }

    /// Registered extensions, lower-cased with a leading dot.
    pub fn extensions(&self) -> impl Iterator<Item = &str> {
        self.mappings.iter().map(|(ext, _)| ext.as_str())
    }

    /// Capability for a single extension such as `"PNG"` or `".tar.gz"`.
    pub fn capability_for_extension(&self, extension: &str) -> CapabilityType {
        let extension = normalize_extension(extension);
        self.mappings
            .iter()
            .find(|(ext, _)| *ext == extension)
            .map(|(_, capability)| *capability)
            .unwrap_or(self.default)
    }

    /// Capability for a source path.
    pub fn lookup(&self, path: &Path) -> CapabilityType {
        let Some(name) = path.file_name().map(|n| n.to_string_lossy().to_lowercase()) else {
            return self.default;
        };

        self.mappings
            .iter()
            .filter(|(ext, _)| name.len() > ext.len() && name.ends_with(ext.as_str()))
            .max_by_key(|(ext, _)| ext.len())
            .map(|(_, capability)| *capability)
            .unwrap_or(self.default)
    }

    /// Whether the path has an explicitly registered extension.
    pub fn is_supported(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().map(|n| n.to_string_lossy().to_lowercase()) else {
            return false;
        };
        self.mappings
            .iter()
            .any(|(ext, _)| name.len() > ext.len() && name.ends_with(ext.as_str()))
    }
}

fn normalize_extension(extension: &str) -> String {
    let lower = extension.to_lowercase();
    if lower.starts_with('.') {
        lower
    } else {
        format!(".{}", lower)
    }
}
