//! Parser registration table.
//!
//! Surrounding applications pick between parser implementations by name.
//! Entries are registered explicitly when the registry is built; nothing is
//! registered as a side effect of loading a module.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::RegistryError;
use crate::models::config::FlowConfig;

use super::{HeuristicParser, InvoiceParser};

/// Constructor for a registered parser.
pub type ParserConstructor = fn(&FlowConfig) -> Box<dyn InvoiceParser>;

/// Metadata describing a registered parser.
#[derive(Clone)]
pub struct ParserMeta {
    pub constructor: ParserConstructor,
    pub requires_credential: bool,
    pub available: bool,
    pub unavailable_reason: Option<String>,
}

impl ParserMeta {
    /// An available parser with no credential requirement.
    pub fn new(constructor: ParserConstructor) -> Self {
        Self {
            constructor,
            requires_credential: false,
            available: true,
            unavailable_reason: None,
        }
    }

    pub fn requiring_credential(mut self) -> Self {
        self.requires_credential = true;
        self
    }

    pub fn unavailable(mut self, reason: impl Into<String>) -> Self {
        self.available = false;
        self.unavailable_reason = Some(reason.into());
        self
    }
}

impl std::fmt::Debug for ParserMeta {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParserMeta")
            .field("requires_credential", &self.requires_credential)
            .field("available", &self.available)
            .field("unavailable_reason", &self.unavailable_reason)
            .finish_non_exhaustive()
    }
}

/// Name → parser table.
#[derive(Debug, Clone, Default)]
pub struct ParserRegistry {
    entries: BTreeMap<String, ParserMeta>,
}

impl ParserRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the parsers shipped in this crate.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(
            HeuristicParser::NAME,
            ParserMeta::new(|config| Box::new(HeuristicParser::from_config(&config.extraction))),
        );
        registry
    }

    /// Register (or replace) a parser. Names are case-insensitive.
    pub fn register(&mut self, name: &str, meta: ParserMeta) {
        debug!("Registering parser '{}'", name);
        self.entries.insert(name.to_lowercase(), meta);
    }

    pub fn get(&self, name: &str) -> Option<&ParserMeta> {
        self.entries.get(&name.to_lowercase())
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// Registrations sorted by name.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &ParserMeta)> {
        self.entries.iter().map(|(name, meta)| (name.as_str(), meta))
    }

    /// Build the parser registered under `name`.
    pub fn create(
        &self,
        name: &str,
        config: &FlowConfig,
        credential_present: bool,
    ) -> Result<Box<dyn InvoiceParser>, RegistryError> {
        let key = name.to_lowercase();
        let meta = self.entries.get(&key).ok_or_else(|| RegistryError::UnknownParser {
            name: key.clone(),
            available: self.names(),
        })?;

        if !meta.available {
            return Err(RegistryError::Unavailable {
                name: key,
                reason: meta
                    .unavailable_reason
                    .clone()
                    .unwrap_or_else(|| "not available in this build".to_string()),
            });
        }

        if meta.requires_credential && !credential_present {
            return Err(RegistryError::MissingCredential(key));
        }

        Ok((meta.constructor)(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::invoice::ParsedInvoice;
    use crate::models::raw::RawInput;

    struct EchoParser;

    impl InvoiceParser for EchoParser {
        fn name(&self) -> &str {
            "echo"
        }

        fn parse(&self, _input: &RawInput) -> ParsedInvoice {
            ParsedInvoice::failed("echo")
        }
    }

    #[test]
    fn test_builtin_heuristic() {
        let registry = ParserRegistry::builtin();
        let meta = registry.get("Heuristic").unwrap();
        assert!(!meta.requires_credential);
        assert!(meta.available);

        let parser = registry.create("HEURISTIC", &FlowConfig::default(), false).unwrap();
        assert_eq!(parser.name(), "heuristic");
    }

    #[test]
    fn test_unknown_parser_lists_available() {
        let registry = ParserRegistry::builtin();
        let err = registry.create("llm", &FlowConfig::default(), true).err().unwrap();

        assert_eq!(
            err,
            RegistryError::UnknownParser {
                name: "llm".to_string(),
                available: vec!["heuristic".to_string()],
            }
        );
    }

    #[test]
    fn test_credential_and_availability() {
        let mut registry = ParserRegistry::builtin();
        registry.register("echo", ParserMeta::new(|_| Box::new(EchoParser)).requiring_credential());
        registry.register(
            "offline",
            ParserMeta::new(|_| Box::new(EchoParser)).unavailable("model not bundled"),
        );

        let config = FlowConfig::default();
        assert_eq!(
            registry.create("echo", &config, false).err(),
            Some(RegistryError::MissingCredential("echo".to_string()))
        );
        assert!(registry.create("echo", &config, true).is_ok());
        assert!(matches!(
            registry.create("offline", &config, true).err(),
            Some(RegistryError::Unavailable { .. })
        ));
        assert_eq!(registry.names(), vec!["echo", "heuristic", "offline"]);
    }
}
