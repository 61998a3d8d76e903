//! Quarry CLI - Command-line host for the model ingestion pipeline

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{ingest, staging};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "quarry")]
#[command(about = "Stage and validate local GLB/glTF models for loading", long_about = None)]
#[command(version)]
struct Cli {
    /// Log debug output (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Copy a model into the staging area and validate it
    Ingest {
        /// Path or file:// URI of the model
        path: String,

        /// Display name to classify by (defaults to the file name)
        #[arg(long)]
        name: Option<String>,

        /// MIME hint (defaults to a guess from the file name)
        #[arg(long)]
        mime: Option<String>,

        /// Staging directory (overrides config)
        #[arg(long)]
        staging_dir: Option<String>,

        /// Load the staged model with the glTF loader
        #[arg(long)]
        load: bool,

        /// Output format (text or json)
        #[arg(long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },

    /// Staging area operations
    #[command(subcommand)]
    Staging(staging::StagingCommands),
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Ingest {
            path,
            name,
            mime,
            staging_dir,
            load,
            format,
        } => ingest::run(ingest::IngestArgs {
            path,
            name,
            mime,
            staging_dir,
            load,
            format,
        }),
        Commands::Staging(cmd) => staging::run(cmd),
    }
}
