//! OCR command - run only the extraction backend and preview its output.

use std::path::{Path, PathBuf};

use clap::Args;
use console::style;

use invoiceflow_core::models::raw::reading_order_text;
use invoiceflow_core::{Dispatcher, RawInput};

use super::load_config;

/// Arguments for the ocr command.
#[derive(Args)]
pub struct OcrArgs {
    /// Input file (PDF or image)
    #[arg(required = true)]
    input: PathBuf,

    /// Number of characters shown in the preview
    #[arg(long, default_value = "500")]
    preview: usize,
}

pub async fn run(args: OcrArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let dispatcher = Dispatcher::from_config(&config);

    println!(
        "{} {} -> {}",
        style("ℹ").blue(),
        args.input.display(),
        dispatcher.capability_for(&args.input)
    );

    let input = args.input.clone();
    let raw = tokio::task::spawn_blocking(move || dispatcher.process(&input)).await??;

    let text = match &raw {
        RawInput::Text(text) => {
            println!("Text:  yes ({} chars)", text.chars().count());
            println!("Table: no");
            text.clone()
        }
        RawInput::Table(cells) => {
            println!("Text:  no");
            println!("Table: yes ({} cells)", cells.len());
            reading_order_text(cells)
        }
    };

    if raw.is_empty() {
        println!("{}", style("No text recognized").yellow());
        return Ok(());
    }

    println!();
    println!("{}", preview(&text, args.preview));

    Ok(())
}

fn preview(text: &str, max_chars: usize) -> String {
    let mut out: String = text.chars().take(max_chars).collect();
    if text.chars().count() > max_chars {
        out.push_str("...");
    }
    out
}
