//! Parse command - extract fields from text recognized elsewhere.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use tracing::info;

use invoiceflow_core::invoice::ParserRegistry;

use super::load_config;
use super::process::{format_invoice, print_validation, OutputFormat};

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Text file containing OCR output
    #[arg(required = true)]
    input: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Parser to use (default from config)
    #[arg(short, long)]
    parser: Option<String>,

    /// Validate extracted data
    #[arg(long)]
    validate: bool,
}

pub async fn run(args: ParseArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let parser_name = args.parser.as_deref().unwrap_or(&config.parser.default_parser);
    let parser = ParserRegistry::builtin().create(parser_name, &config, false)?;

    let text = fs::read_to_string(&args.input)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", args.input.display(), e))?;
    info!("Parsing {} chars from {}", text.len(), args.input.display());

    let invoice = parser.parse_text(&text);

    if args.validate && !invoice.is_error() {
        print_validation(&invoice);
    }

    println!("{}", format_invoice(&invoice, args.format)?);

    if let Some(error) = &invoice.error {
        anyhow::bail!("Parsing failed: {}", error);
    }

    Ok(())
}
