//! Process command - run the full pipeline on a single invoice file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use invoiceflow_core::invoice::ParserRegistry;
use invoiceflow_core::{InvoicePipeline, ParsedInvoice};

use super::load_config;

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (PDF or image)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

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

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

pub async fn run(args: ProcessArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let parser_name = args.parser.as_deref().unwrap_or(&config.parser.default_parser);
    let pipeline = InvoicePipeline::with_parser(&config, &ParserRegistry::builtin(), parser_name)?;

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(format!("Processing {}...", args.input.display()));

    let input = args.input.clone();
    let invoice = tokio::task::spawn_blocking(move || pipeline.run(&input)).await?;

    pb.finish_and_clear();

    if args.validate && !invoice.is_error() {
        print_validation(&invoice);
    }

    let output = format_invoice(&invoice, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    if let Some(error) = &invoice.error {
        anyhow::bail!("Processing failed: {}", error);
    }

    Ok(())
}

pub fn print_validation(invoice: &ParsedInvoice) {
    let validation = invoice.validate();
    if validation.is_valid {
        eprintln!("{} All validation checks passed", style("✓").green());
        return;
    }

    eprintln!("{}", style("Validation issues:").yellow());
    for (check, passed) in &validation.checks {
        if !passed {
            let detail = validation
                .errors
                .as_ref()
                .and_then(|errors| errors.get(check))
                .map(String::as_str)
                .unwrap_or("failed");
            eprintln!("  - {}: {}", check, detail);
        }
    }
}

pub fn format_invoice(invoice: &ParsedInvoice, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(invoice)?),
        OutputFormat::Csv => format_csv(invoice),
        OutputFormat::Text => Ok(format_text(invoice)),
    }
}

fn format_csv(invoice: &ParsedInvoice) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "invoice_id",
        "vendor_name",
        "invoice_date",
        "total_amount",
        "raw_text_length",
        "error",
    ])?;

    wtr.write_record([
        invoice.invoice_id.clone().unwrap_or_default(),
        invoice.vendor_name.clone().unwrap_or_default(),
        invoice.invoice_date.clone().unwrap_or_default(),
        invoice.total_amount.map(|t| t.to_string()).unwrap_or_default(),
        invoice.raw_text_length.to_string(),
        invoice.error.clone().unwrap_or_default(),
    ])?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(invoice: &ParsedInvoice) -> String {
    if let Some(error) = &invoice.error {
        return format!("Error: {}\n", error);
    }

    let field = |value: Option<&str>| value.unwrap_or("-").to_string();
    let mut output = String::new();

    output.push_str(&format!("Invoice: {}\n", field(invoice.invoice_id.as_deref())));
    output.push_str(&format!("Vendor:  {}\n", field(invoice.vendor_name.as_deref())));
    output.push_str(&format!("Date:    {}\n", field(invoice.invoice_date.as_deref())));
    match invoice.total_amount {
        Some(total) => output.push_str(&format!("Total:   {:.2}\n", total)),
        None => output.push_str("Total:   -\n"),
    }

    if let Some(summary) = &invoice.summary {
        output.push_str(&format!(
            "\nOCR table: {} cells in {} rows, mean confidence {:.2}\n",
            summary.num_cells, summary.num_rows, summary.mean_confidence
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ParsedInvoice {
        ParsedInvoice {
            invoice_id: Some("INV-1".to_string()),
            vendor_name: Some("Acme, Inc".to_string()),
            total_amount: Some(12.5),
            raw_text_length: 40,
            ..ParsedInvoice::default()
        }
    }

    #[test]
    fn test_csv_quotes_commas() {
        let csv = format_csv(&sample()).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("invoice_id,vendor_name,invoice_date,total_amount,raw_text_length,error"));
        assert_eq!(lines.next(), Some("INV-1,\"Acme, Inc\",,12.5,40,"));
    }

    #[test]
    fn test_text_output() {
        let text = format_text(&sample());
        assert!(text.contains("Invoice: INV-1"));
        assert!(text.contains("Date:    -"));
        assert!(text.contains("Total:   12.50"));

        let failed = format_text(&ParsedInvoice::failed("File not found: x.pdf"));
        assert_eq!(failed, "Error: File not found: x.pdf\n");
    }
}
