//! Subcommand implementations.

pub mod batch;
pub mod config;
pub mod ocr;
pub mod parse;
pub mod parsers;
pub mod process;

use std::path::{Path, PathBuf};

use tracing::debug;

use invoiceflow_core::FlowConfig;

/// `<config dir>/invoiceflow/config.json`.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("invoiceflow")
        .join("config.json")
}

/// Load the explicit config file, else the default one if present, else defaults.
pub fn load_config(config_path: Option<&Path>) -> anyhow::Result<FlowConfig> {
    if let Some(path) = config_path {
        debug!("Loading config from {}", path.display());
        return Ok(FlowConfig::from_file(path)?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Loading config from {}", default_path.display());
        Ok(FlowConfig::from_file(&default_path)?)
    } else {
        Ok(FlowConfig::default())
    }
}
