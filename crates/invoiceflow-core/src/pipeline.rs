//! End-to-end processing: file → backend → raw input → parsed invoice.

use std::path::Path;
use std::time::Instant;

use tracing::{info, warn};

use crate::error::{DispatchError, RegistryError};
use crate::invoice::{InvoiceParser, ParserRegistry};
use crate::models::config::FlowConfig;
use crate::models::invoice::ParsedInvoice;
use crate::models::raw::RawInput;
use crate::ocr::Dispatcher;

/// Runs a document through backend dispatch and a parser.
///
/// [`InvoicePipeline::run`] never fails: missing files, backend construction
/// problems and extraction failures all come back as a [`ParsedInvoice`]
/// carrying an error message. Shareable across threads.
pub struct InvoicePipeline {
    dispatcher: Dispatcher,
    parser: Box<dyn InvoiceParser>,
}

impl InvoicePipeline {
    pub fn new(dispatcher: Dispatcher, parser: Box<dyn InvoiceParser>) -> Self {
        Self { dispatcher, parser }
    }

    /// Pipeline with native backends and the configured default parser.
    pub fn from_config(config: &FlowConfig) -> Result<Self, RegistryError> {
        Self::with_parser(config, &ParserRegistry::builtin(), &config.parser.default_parser)
    }

    /// Pipeline with native backends and a parser looked up by name.
    pub fn with_parser(
        config: &FlowConfig,
        registry: &ParserRegistry,
        parser_name: &str,
    ) -> Result<Self, RegistryError> {
        let parser = registry.create(parser_name, config, false)?;
        Ok(Self::new(Dispatcher::from_config(config), parser))
    }

    pub fn parser_name(&self) -> &str {
        self.parser.name()
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Extract raw input without parsing.
    pub fn process(&self, source: &Path) -> Result<RawInput, DispatchError> {
        self.dispatcher.process(source)
    }

    /// Process a document into invoice fields.
    pub fn run(&self, source: &Path) -> ParsedInvoice {
        let start = Instant::now();

        let result = match self.dispatcher.process(source) {
            Ok(raw) => self.parser.parse(&raw),
            Err(e) => {
                warn!("{}: {}", source.display(), e);
                return ParsedInvoice::failed(e.to_string());
            }
        };

        info!(
            "Parsed {} with {} in {}ms",
            source.display(),
            self.parser.name(),
            start.elapsed().as_millis()
        );
        result
    }

    /// Parse text that was recognized elsewhere.
    pub fn run_text(&self, text: &str) -> ParsedInvoice {
        self.parser.parse_text(text)
    }
}
