//! CLI command implementations

pub mod ingest;
pub mod staging;

use quarry_ingest::IngestConfig;

/// Load layered config, letting a command-line staging dir win
pub fn load_config(staging_dir: Option<&str>) -> anyhow::Result<IngestConfig> {
    let mut config = IngestConfig::load()?;
    if let Some(dir) = staging_dir {
        config.staging_dir = dir.into();
    }
    Ok(config)
}
