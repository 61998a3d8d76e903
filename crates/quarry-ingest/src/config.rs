//! Layered configuration system
//!
//! Config is loaded with three layers of precedence (highest wins):
//! 1. Environment variables: `QUARRY_STAGING_DIR`, `QUARRY_CHUNK_SIZE`
//! 2. Project-local: `.quarry/config.toml`
//! 3. Global: `~/.quarry/config.toml`

use crate::loader::{LoadOptions, RecenterMode};
use crate::staging::{TempStagingDir, DEFAULT_PREFIX};
use quarry_core::{QuarryError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Copy buffer size used when nothing overrides it
pub const DEFAULT_CHUNK_SIZE: usize = 8 * 1024;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StagingSection {
    #[serde(default)]
    pub dir: Option<PathBuf>,
    #[serde(default)]
    pub prefix: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CopySection {
    #[serde(default)]
    pub chunk_size: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoadSection {
    #[serde(default)]
    pub scale: Option<f32>,
    #[serde(default)]
    pub recenter: Option<RecenterMode>,
}

/// Config file structure; every field is optional so layers can overlay
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestConfigFile {
    #[serde(default)]
    pub staging: StagingSection,
    #[serde(default)]
    pub copy: CopySection,
    #[serde(default)]
    pub load: LoadSection,
}

/// Resolved configuration with environment variable overrides applied
#[derive(Debug, Clone, PartialEq)]
pub struct IngestConfig {
    pub staging_dir: PathBuf,
    pub staging_prefix: String,
    pub chunk_size: usize,
    pub load: LoadOptions,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            staging_dir: TempStagingDir::default_root(),
            staging_prefix: DEFAULT_PREFIX.to_string(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            load: LoadOptions::default(),
        }
    }
}

impl IngestConfig {
    /// Load config with layered precedence: global < project < env vars
    pub fn load() -> Result<Self> {
        let mut config = IngestConfigFile::default();

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                let global = Self::load_file(&global_path)?;
                Self::merge_into(&mut config, global);
            }
        }

        let local_path = PathBuf::from(".quarry/config.toml");
        if local_path.exists() {
            let local = Self::load_file(&local_path)?;
            Self::merge_into(&mut config, local);
        }

        Self::apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
        Self::resolve(config)
    }

    /// Load config from a specific file path only (for testing)
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let mut config = Self::load_file(path)?;
        Self::apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
        Self::resolve(config)
    }

    /// Staging area described by this config
    pub fn staging(&self) -> TempStagingDir {
        TempStagingDir::new(&self.staging_dir).with_prefix(self.staging_prefix.clone())
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".quarry").join("config.toml"))
    }

    fn load_file(path: &Path) -> Result<IngestConfigFile> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| {
            QuarryError::ConfigError(format!("Failed to parse config {}: {}", path.display(), e))
        })
    }

    fn merge_into(base: &mut IngestConfigFile, overlay: IngestConfigFile) {
        if overlay.staging.dir.is_some() {
            base.staging.dir = overlay.staging.dir;
        }
        if overlay.staging.prefix.is_some() {
            base.staging.prefix = overlay.staging.prefix;
        }
        if overlay.copy.chunk_size.is_some() {
            base.copy.chunk_size = overlay.copy.chunk_size;
        }
        if overlay.load.scale.is_some() {
            base.load.scale = overlay.load.scale;
        }
        if overlay.load.recenter.is_some() {
            base.load.recenter = overlay.load.recenter;
        }
    }

    fn apply_env_overrides<F>(config: &mut IngestConfigFile, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup("QUARRY_STAGING_DIR") {
            config.staging.dir = Some(PathBuf::from(dir));
        }
        if let Some(raw) = lookup("QUARRY_CHUNK_SIZE") {
            let size = raw.trim().parse::<usize>().map_err(|e| {
                QuarryError::ConfigError(format!("Invalid QUARRY_CHUNK_SIZE '{}': {}", raw, e))
            })?;
            config.copy.chunk_size = Some(size);
        }
        Ok(())
    }

    fn resolve(file: IngestConfigFile) -> Result<Self> {
        let defaults = Self::default();

        let chunk_size = file.copy.chunk_size.unwrap_or(defaults.chunk_size);
        if chunk_size == 0 {
            return Err(QuarryError::ConfigError(
                "copy.chunk_size must be greater than zero".to_string(),
            ));
        }

        let scale = file.load.scale.unwrap_or(defaults.load.scale);
        if !(scale.is_finite() && scale > 0.0) {
            return Err(QuarryError::ConfigError(format!(
                "load.scale must be a positive number, got {}",
                scale
            )));
        }

        let staging_prefix = file.staging.prefix.unwrap_or(defaults.staging_prefix);
        if staging_prefix.is_empty() || staging_prefix.contains(['/', '\\']) {
            return Err(QuarryError::ConfigError(format!(
                "staging.prefix must be a non-empty file name prefix, got '{}'",
                staging_prefix
            )));
        }

        Ok(Self {
            staging_dir: file.staging.dir.unwrap_or(defaults.staging_dir),
            staging_prefix,
            chunk_size,
            load: LoadOptions {
                scale,
                recenter: file.load.recenter.unwrap_or(defaults.load.recenter),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn parse(content: &str) -> IngestConfigFile {
        toml::from_str(content).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = IngestConfig::resolve(IngestConfigFile::default()).unwrap();
        assert_eq!(config.chunk_size, 8192);
        assert_eq!(config.staging_prefix, "ar_model_");
        assert_eq!(config.load, LoadOptions::default());
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = std::env::temp_dir().join(format!("quarry_config_test_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(
            &path,
            r#"
[staging]
dir = "/var/tmp/models"
prefix = "picked_"

[copy]
chunk_size = 4096

[load]
scale = 1.5
recenter = "none"
"#,
        )
        .unwrap();

        let config = IngestConfig::load_from_file(&path).unwrap();
        assert_eq!(config.staging_prefix, "picked_");
        assert_eq!(config.load.scale, 1.5);
        assert_eq!(config.load.recenter, RecenterMode::None);

        // Without the process environment in the way
        let mut file = IngestConfig::load_file(&path).unwrap();
        IngestConfig::apply_env_overrides(&mut file, |_| None).unwrap();
        let config = IngestConfig::resolve(file).unwrap();
        assert_eq!(config.staging_dir, PathBuf::from("/var/tmp/models"));
        assert_eq!(config.chunk_size, 4096);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_merge_overlay_wins() {
        let mut base = parse("[copy]\nchunk_size = 1024\n[staging]\nprefix = \"global_\"");
        let overlay = parse("[copy]\nchunk_size = 2048");
        IngestConfig::merge_into(&mut base, overlay);

        let config = IngestConfig::resolve(base).unwrap();
        assert_eq!(config.chunk_size, 2048);
        assert_eq!(config.staging_prefix, "global_");
    }

    #[test]
    fn test_env_override() {
        let env: HashMap<&str, &str> = [
            ("QUARRY_STAGING_DIR", "/env/staging"),
            ("QUARRY_CHUNK_SIZE", "512"),
        ]
        .into_iter()
        .collect();

        let mut file = parse("[copy]\nchunk_size = 4096");
        IngestConfig::apply_env_overrides(&mut file, |k| env.get(k).map(|v| v.to_string()))
            .unwrap();
        let config = IngestConfig::resolve(file).unwrap();

        assert_eq!(config.staging_dir, PathBuf::from("/env/staging"));
        assert_eq!(config.chunk_size, 512);
    }

    #[test]
    fn test_invalid_env_chunk_size() {
        let mut file = IngestConfigFile::default();
        let result = IngestConfig::apply_env_overrides(&mut file, |k| {
            (k == "QUARRY_CHUNK_SIZE").then(|| "lots".to_string())
        });
        assert!(matches!(result, Err(QuarryError::ConfigError(_))));
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let result = IngestConfig::resolve(parse("[copy]\nchunk_size = 0"));
        assert!(matches!(result, Err(QuarryError::ConfigError(_))));
    }

    #[test]
    fn test_negative_scale_rejected() {
        let result = IngestConfig::resolve(parse("[load]\nscale = -1.0"));
        assert!(matches!(result, Err(QuarryError::ConfigError(_))));
    }

    #[test]
    fn test_unusable_prefix_rejected() {
        for content in ["[staging]\nprefix = \"\"", "[staging]\nprefix = \"../x_\""] {
            let result = IngestConfig::resolve(parse(content));
            assert!(matches!(result, Err(QuarryError::ConfigError(_))));
        }
    }
}
