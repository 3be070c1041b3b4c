//! CLI application for offline invoice parsing.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{batch, config, ocr, parse, parsers, process};

/// Offline invoice parser - extract invoice ID, vendor, date and total from documents
#[derive(Parser)]
#[command(name = "invoiceflow")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a single invoice file
    Process(process::ProcessArgs),

    /// Process every invoice in a directory or glob
    Batch(batch::BatchArgs),

    /// Parse an already-recognized text file
    Parse(parse::ParseArgs),

    /// Run only the extraction backend and preview its output
    Ocr(ocr::OcrArgs),

    /// List registered parsers
    Parsers,

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Process(args) => process::run(args, config_path).await,
        Commands::Batch(args) => batch::run(args, config_path).await,
        Commands::Parse(args) => parse::run(args, config_path).await,
        Commands::Ocr(args) => ocr::run(args, config_path).await,
        Commands::Parsers => parsers::run(config_path).await,
        Commands::Config(args) => config::run(args, config_path).await,
    }
}
