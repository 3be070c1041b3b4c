//! Tesseract command-line backend for scans and unrecognized formats.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info};

use super::{CapabilityType, OcrBackend};
use crate::error::OcrError;
use crate::models::raw::RawInput;

/// Runs `tesseract <file> stdout -l <lang>` and returns its plain text.
#[derive(Debug, Clone)]
pub struct TesseractBackend {
    binary: PathBuf,
    language: String,
}

impl TesseractBackend {
    /// Create a backend using `tesseract` from `PATH`.
    ///
    /// Fails with [`OcrError::BackendNotAvailable`] when the binary cannot
    /// be executed.
    pub fn new(language: &str) -> Result<Self, OcrError> {
        Self::with_binary("tesseract", language)
    }

    /// Create a backend using a specific tesseract binary.
    pub fn with_binary(binary: impl Into<PathBuf>, language: &str) -> Result<Self, OcrError> {
        let backend = Self {
            binary: binary.into(),
            language: language.to_string(),
        };
        backend.check_available()?;
        info!("Using tesseract at {} (lang {})", backend.binary.display(), backend.language);
        Ok(backend)
    }

    fn check_available(&self) -> Result<(), OcrError> {
        match Command::new(&self.binary).arg("--version").output() {
            Ok(output) if output.status.success() => Ok(()),
            Ok(output) => Err(OcrError::BackendNotAvailable(format!(
                "{} --version exited with {}",
                self.binary.display(),
                output.status
            ))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(OcrError::BackendNotAvailable(
                    "tesseract not found (install tesseract-ocr)".to_string(),
                ))
            }
            Err(e) => Err(OcrError::Io(e)),
        }
    }
}

impl OcrBackend for TesseractBackend {
    fn capability(&self) -> CapabilityType {
        CapabilityType::ScannedFallback
    }

    fn extract(&self, source: &Path) -> Result<RawInput, OcrError> {
        debug!("Running tesseract on {}", source.display());

        let output = Command::new(&self.binary)
            .arg(source)
            .arg("stdout")
            .args(["-l", &self.language])
            .output();

        match output {
            Ok(output) if output.status.success() => {
                let text = String::from_utf8_lossy(&output.stdout).to_string();
                info!("Tesseract recognized {} chars from {}", text.len(), source.display());
                Ok(RawInput::Text(text))
            }
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                Err(OcrError::Recognition(format!("tesseract failed: {}", stderr.trim())))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(OcrError::BackendNotAvailable(
                    "tesseract not found (install tesseract-ocr)".to_string(),
                ))
            }
            Err(e) => Err(OcrError::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_binary_fails_construction() {
        let result = TesseractBackend::with_binary("/nonexistent/bin/tesseract", "eng");
        assert!(matches!(result, Err(OcrError::BackendNotAvailable(_))));
    }
}
