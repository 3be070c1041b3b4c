//! Batch processing command for multiple invoice files.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use futures_util::stream::{self, StreamExt};
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{debug, warn};

use invoiceflow_core::invoice::ParserRegistry;
use invoiceflow_core::{InvoicePipeline, ParsedInvoice};

use super::load_config;

/// Extensions picked up from a directory or glob.
const SUPPORTED_EXTENSIONS: [&str; 6] = ["pdf", "png", "jpg", "jpeg", "tif", "tiff"];

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input directory or glob pattern
    #[arg(required = true)]
    input: String,

    /// Directory for the results file (default: current directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Number of files processed at once
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Parser to use (default from config)
    #[arg(short, long)]
    parser: Option<String>,
}

/// One entry of the results file.
#[derive(Debug, Serialize)]
struct BatchRecord {
    file: String,
    full_path: String,
    parser_used: String,
    result: ParsedInvoice,
}

pub async fn run(args: BatchArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let parser_name = args.parser.as_deref().unwrap_or(&config.parser.default_parser);
    let pipeline = Arc::new(InvoicePipeline::with_parser(
        &config,
        &ParserRegistry::builtin(),
        parser_name,
    )?);
    let parser_used = pipeline.parser_name().to_string();

    let files = collect_files(&args.input)?;
    if files.is_empty() {
        anyhow::bail!("No matching files found for: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let mut records: Vec<BatchRecord> = stream::iter(files)
        .map(|path| {
            let pipeline = Arc::clone(&pipeline);
            let parser_used = parser_used.clone();
            let pb = pb.clone();
            async move {
                let source = path.clone();
                let result = tokio::task::spawn_blocking(move || pipeline.run(&source))
                    .await
                    .unwrap_or_else(|e| ParsedInvoice::failed(format!("worker failed: {}", e)));

                if let Some(error) = &result.error {
                    warn!("Failed to process {}: {}", path.display(), error);
                }
                pb.inc(1);

                BatchRecord {
                    file: path
                        .file_name()
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_default(),
                    full_path: path.display().to_string(),
                    parser_used,
                    result,
                }
            }
        })
        .buffer_unordered(args.jobs.max(1))
        .collect()
        .await;

    pb.finish_and_clear();
    records.sort_by(|a, b| a.full_path.cmp(&b.full_path));

    let output_dir = args.output_dir.unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&output_dir)?;
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let results_path = output_dir.join(format!("results_{}.json", timestamp));
    fs::write(&results_path, serde_json::to_string_pretty(&records)?)?;
    debug!("Wrote results to {}", results_path.display());

    let failed: Vec<&BatchRecord> = records.iter().filter(|r| r.result.is_error()).collect();

    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        records.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(records.len() - failed.len()).green(),
        style(failed.len()).red()
    );
    println!(
        "{} Results written to {}",
        style("✓").green(),
        results_path.display()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for record in &failed {
            println!(
                "  - {}: {}",
                record.file,
                record.result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

/// Supported files in a directory (non-recursive) or matching a glob, sorted.
fn collect_files(input: &str) -> anyhow::Result<Vec<PathBuf>> {
    let root = Path::new(input);
    let candidates: Vec<PathBuf> = if root.is_dir() {
        fs::read_dir(root)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .collect()
    } else {
        glob(input)?.filter_map(|r| r.ok()).collect()
    };

    let mut files: Vec<PathBuf> = candidates
        .into_iter()
        .filter(|p| p.is_file() && is_supported(p))
        .collect();
    files.sort();
    Ok(files)
}

fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| SUPPORTED_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_files_filters_extensions() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.pdf", "b.JPG", "c.txt", "d.tiff"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        fs::create_dir(dir.path().join("nested.pdf")).unwrap();

        let files = collect_files(dir.path().to_str().unwrap()).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();

        assert_eq!(names, vec!["a.pdf", "b.JPG", "d.tiff"]);
    }

    #[test]
    fn test_collect_files_glob() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["one.pdf", "two.pdf", "three.png"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }

        let pattern = format!("{}/*.pdf", dir.path().display());
        assert_eq!(collect_files(&pattern).unwrap().len(), 2);
    }
}
