//! Staging area commands

use anyhow::Result;
use clap::Subcommand;
use quarry_ingest::TempStagingDir;

#[derive(Subcommand)]
pub enum StagingCommands {
    /// List staged model files
    List {
        /// Staging directory (overrides config)
        #[arg(long)]
        staging_dir: Option<String>,
    },

    /// Delete every staged model file
    Purge {
        /// Staging directory (overrides config)
        #[arg(long)]
        staging_dir: Option<String>,
    },
}

pub fn run(cmd: StagingCommands) -> Result<()> {
    match cmd {
        StagingCommands::List { staging_dir } => {
            let staging = super::load_config(staging_dir.as_deref())?.staging();
            list_staged(&staging).map(|_| ())
        }
        StagingCommands::Purge { staging_dir } => {
            let staging = super::load_config(staging_dir.as_deref())?.staging();
            let removed = staging.purge()?;
            println!("Removed {} staged model(s) from {}", removed, staging.root().display());
            Ok(())
        }
    }
}

/// Print the staged files, returning how many there were
fn list_staged(staging: &TempStagingDir) -> Result<usize> {
    let files = staging.list()?;
    if files.is_empty() {
        println!("No staged models in {}", staging.root().display());
        return Ok(0);
    }
    println!("Staged models in {}:", staging.root().display());
    for path in &files {
        let size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
        println!("  {} ({} bytes)", path.display(), size);
    }
    Ok(files.len())
}
