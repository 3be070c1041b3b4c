//! Parsers command - list the parser registration table.

use std::path::Path;

use console::style;

use invoiceflow_core::invoice::ParserRegistry;

use super::load_config;

pub async fn run(config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let registry = ParserRegistry::builtin();

    println!("{}", style("Registered parsers:").bold());
    for (name, meta) in registry.entries() {
        let default_marker = if name == config.parser.default_parser.to_lowercase() {
            " (default)"
        } else {
            ""
        };
        let status = if meta.available {
            style("available".to_string()).green()
        } else {
            let reason = meta.unavailable_reason.as_deref().unwrap_or("unavailable");
            style(format!("unavailable: {}", reason)).red()
        };
        let credential = if meta.requires_credential {
            ", requires API credential"
        } else {
            ""
        };

        println!("  {}{} - {}{}", name, default_marker, status, credential);
    }

    Ok(())
}
