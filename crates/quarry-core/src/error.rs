//! Error types for Quarry

use thiserror::Error;

/// The main error type for Quarry operations outside the ingestion boundary
#[derive(Debug, Error)]
pub enum QuarryError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Staging error: {0}")]
    StagingError(String),

    #[error("Import error: {0}")]
    ImportError(String),
}

/// Result type alias for Quarry operations
pub type Result<T> = std::result::Result<T, QuarryError>;

impl From<toml::de::Error> for QuarryError {
    fn from(err: toml::de::Error) -> Self {
        QuarryError::TomlParseError(err.to_string())
    }
}
