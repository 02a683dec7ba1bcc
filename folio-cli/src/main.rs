//! Folio CLI - Command-line interface for text ingestion

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Parse and validate jobs argument (must be at least 1)
fn parse_jobs(s: &str) -> Result<usize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if n < 1 {
        Err("jobs must be at least 1".to_string())
    } else {
        Ok(n)
    }
}

#[derive(Parser)]
#[command(name = "folio")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest a text file and write the document model as JSON
    Ingest {
        /// Input file path
        input: String,

        /// Output file path (stdout when omitted)
        #[arg(short, long)]
        output: Option<String>,

        /// Weight budget per page
        #[arg(long, default_value = "300")]
        lines_per_page: u32,

        /// Encoding label override (e.g. gbk, utf-8)
        #[arg(long)]
        encoding: Option<String>,

        /// Streaming chunk size in bytes
        #[arg(long, default_value = "65536")]
        chunk_size: usize,
    },

    /// Display summary information about a text file
    Info {
        /// Input file path
        input: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Ingest every text file in a directory
    Batch {
        /// Input directory
        input_dir: String,

        /// Output directory for the JSON models
        #[arg(short, long)]
        output_dir: String,

        /// Number of parallel jobs (must be at least 1)
        #[arg(short, long, default_value = "4", value_parser = parse_jobs)]
        jobs: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        "folio_cli=debug,folio_core=debug"
    } else {
        "folio_cli=info"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Ingest {
            input,
            output,
            lines_per_page,
            encoding,
            chunk_size,
        } => commands::ingest(&input, output.as_deref(), lines_per_page, encoding, chunk_size),

        Commands::Info { input, json } => commands::info(&input, json),

        Commands::Batch {
            input_dir,
            output_dir,
            jobs,
        } => commands::batch(&input_dir, &output_dir, jobs),
    }
}
