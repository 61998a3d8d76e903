//! Quarry Ingest - Local model ingestion pipeline
//!
//! This crate turns an opaque resource handle into a validated, typed
//! GLB/glTF file in a staging directory, ready to hand to a loader.
//! Hosts plug in their own content access through `MetadataResolver`,
//! `ByteSource` and `StagingDirectory`.

mod classify;
mod config;
mod glb;
mod ingestor;
mod loader;
mod source;
mod staging;
mod types;

pub use classify::{classify, extension_from_mime, extension_from_name, staging_extension};
pub use config::{IngestConfig, IngestConfigFile, DEFAULT_CHUNK_SIZE};
pub use glb::{GlbHeader, GLB_HEADER_LEN, GLB_MAGIC};
pub use ingestor::{AssetIngestor, Loaded};
pub use loader::{LoadOptions, ModelLoader, RecenterMode};
pub use source::{ByteSource, LocalFileSource, MetadataResolver};
pub use staging::{StagingDirectory, StagingFile, TempStagingDir, DEFAULT_PREFIX};
pub use types::{
    ErrorKind, IngestError, IngestResult, IngestWarning, ModelFormat, ResolvedMetadata,
    ResourceHandle, StagedAsset,
};
