//! Resolve a source file to a cached backend and run it.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::{CapabilityType, ExtractorCache, ExtractorRegistry, OcrBackend, PdfTextBackend, TesseractBackend};
use crate::error::{DispatchError, OcrError};
use crate::models::config::{FlowConfig, OcrConfig};
use crate::models::raw::RawInput;

/// Builds backend instances for a capability type.
pub trait BackendFactory: Send + Sync {
    fn create(&self, capability: CapabilityType) -> Result<Arc<dyn OcrBackend>, DispatchError>;
}

/// Factory for the backends shipped with this crate.
#[derive(Debug, Clone, Default)]
pub struct NativeBackendFactory {
    config: OcrConfig,
}

impl NativeBackendFactory {
    pub fn new(config: OcrConfig) -> Self {
        Self { config }
    }
}

impl BackendFactory for NativeBackendFactory {
    fn create(&self, capability: CapabilityType) -> Result<Arc<dyn OcrBackend>, DispatchError> {
        let construction = |source: OcrError| DispatchError::Construction { capability, source };

        match capability {
            CapabilityType::PdfText => Ok(Arc::new(PdfTextBackend::new(self.config.max_pages))),
            #[cfg(feature = "native")]
            CapabilityType::ImageOcr => {
                let backend = super::ImageOcrBackend::from_config(&self.config).map_err(construction)?;
                Ok(Arc::new(backend))
            }
            #[cfg(not(feature = "native"))]
            CapabilityType::ImageOcr => Err(DispatchError::UnknownCapability(capability)),
            CapabilityType::ScannedFallback => {
                let backend =
                    TesseractBackend::new(&self.config.tesseract_language).map_err(construction)?;
                Ok(Arc::new(backend))
            }
        }
    }
}

/// A resolved backend instance, shared with the cache.
#[derive(Clone)]
pub struct CapabilityHandle {
    capability: CapabilityType,
    backend: Arc<dyn OcrBackend>,
}

impl CapabilityHandle {
    pub fn capability(&self) -> CapabilityType {
        self.capability
    }

    pub fn backend(&self) -> &dyn OcrBackend {
        self.backend.as_ref()
    }

    /// Whether both handles point at the same backend instance.
    pub fn same_instance(&self, other: &CapabilityHandle) -> bool {
        std::ptr::eq(
            Arc::as_ptr(&self.backend) as *const (),
            Arc::as_ptr(&other.backend) as *const (),
        )
    }
}

impl std::fmt::Debug for CapabilityHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapabilityHandle")
            .field("capability", &self.capability)
            .finish_non_exhaustive()
    }
}

/// Maps files to capability types and hands out cached backends.
///
/// Safe to share across threads; every method takes `&self`.
pub struct Dispatcher {
    registry: ExtractorRegistry,
    cache: ExtractorCache,
    factory: Box<dyn BackendFactory>,
}

impl Dispatcher {
    pub fn new(factory: impl BackendFactory + 'static, capacity: usize) -> Self {
        Self {
            registry: ExtractorRegistry::default(),
            cache: ExtractorCache::new(capacity),
            factory: Box::new(factory),
        }
    }

    /// Dispatcher using the native backends configured by `config`.
    pub fn from_config(config: &FlowConfig) -> Self {
        Self::new(NativeBackendFactory::new(config.ocr.clone()), config.cache.capacity)
    }

    /// Replace the extension table.
    pub fn with_registry(mut self, registry: ExtractorRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn registry(&self) -> &ExtractorRegistry {
        &self.registry
    }

    pub fn cache(&self) -> &ExtractorCache {
        &self.cache
    }

    /// Capability that would serve `source`. Does not touch the cache.
    pub fn capability_for(&self, source: &Path) -> CapabilityType {
        self.registry.lookup(source)
    }

    /// Resolve `source` to a backend instance, constructing it on a cache miss.
    pub fn resolve(&self, source: &Path) -> Result<CapabilityHandle, DispatchError> {
        let capability = self.registry.lookup(source);
        debug!("{} -> {}", source.display(), capability);

        let backend = self
            .cache
            .get_or_try_insert_with(capability, || self.factory.create(capability))?;

        Ok(CapabilityHandle { capability, backend })
    }

    /// Run a resolved backend over `source`.
    pub fn extract(&self, handle: &CapabilityHandle, source: &Path) -> Result<RawInput, DispatchError> {
        handle.backend.extract(source).map_err(|e| DispatchError::Extraction {
            capability: handle.capability,
            message: e.to_string(),
        })
    }

    /// Check that `source` exists, resolve it and extract.
    pub fn process(&self, source: &Path) -> Result<RawInput, DispatchError> {
        if !source.exists() {
            warn!("File not found: {}", source.display());
            return Err(DispatchError::FileNotFound(source.to_path_buf()));
        }

        let handle = self.resolve(source)?;
        self.extract(&handle, source)
    }

    /// Discard all cached backends.
    pub fn reset(&self) {
        self.cache.clear();
        info!("Backend cache reset");
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("registry", &self.registry)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}
