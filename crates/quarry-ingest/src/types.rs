//! Ingestion type definitions

use crate::glb::GlbHeader;
use quarry_core::ContentHash;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Opaque reference to caller-provided content (a URI or a path)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceHandle(String);

impl ResourceHandle {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        Self(path.as_ref().to_string_lossy().into_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Name and MIME hints resolved once per ingestion
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedMetadata {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub mime_hint: Option<String>,
}

/// Supported 3D model container formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelFormat {
    /// Binary glTF container
    Glb,
    /// JSON glTF document
    GltfJson,
    Unknown,
}

impl ModelFormat {
    /// Classify a (dot-less) file extension, ignoring case
    pub fn from_extension(extension: &str) -> Self {
        if extension.eq_ignore_ascii_case("gltf") {
            ModelFormat::GltfJson
        } else if extension.eq_ignore_ascii_case("glb") {
            ModelFormat::Glb
        } else {
            ModelFormat::Unknown
        }
    }

    /// Canonical extension for this format
    pub fn extension(&self) -> Option<&'static str> {
        match self {
            ModelFormat::Glb => Some("glb"),
            ModelFormat::GltfJson => Some("gltf"),
            ModelFormat::Unknown => None,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, ModelFormat::Unknown)
    }
}

impl fmt::Display for ModelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ModelFormat::Glb => "glb",
            ModelFormat::GltfJson => "gltf",
            ModelFormat::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Non-fatal findings attached to a successful ingestion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IngestWarning {
    /// The first four bytes are not the GLB magic `glTF`
    BadMagic { found: Vec<u8> },
    /// The staged file is too short to hold a GLB header
    TruncatedHeader { byte_length: u64 },
}

impl fmt::Display for IngestWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngestWarning::BadMagic { found } => {
                write!(f, "GLB magic mismatch: found {:02x?}, expected \"glTF\"", found)
            }
            IngestWarning::TruncatedHeader { byte_length } => {
                write!(f, "GLB header truncated: only {} bytes staged", byte_length)
            }
        }
    }
}

/// A fully copied, classified model file in the staging directory
#[derive(Debug, Clone, Serialize)]
pub struct StagedAsset {
    pub local_path: PathBuf,
    /// Number of bytes copied from the source
    pub byte_length: u64,
    pub format: ModelFormat,
    pub digest: ContentHash,
    /// Parsed GLB header, present only for GLB files long enough to hold one
    pub header: Option<GlbHeader>,
    pub warnings: Vec<IngestWarning>,
}

impl StagedAsset {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Delete the staging file, handing ownership back to nobody
    pub fn release(self) -> std::io::Result<()> {
        match std::fs::remove_file(&self.local_path) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

/// Failure categories reported at the ingestion boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The source stream could not be opened
    SourceUnavailable,
    /// Staging or copying failed; any partial file has been removed
    CopyFailed,
    /// The content classified as `ModelFormat::Unknown`
    UnsupportedFormat,
    /// The downstream loader rejected a staged file
    LoadFailed,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::SourceUnavailable => "source unavailable",
            ErrorKind::CopyFailed => "copy failed",
            ErrorKind::UnsupportedFormat => "unsupported format",
            ErrorKind::LoadFailed => "load failed",
        };
        f.write_str(s)
    }
}

/// Typed ingestion failure
#[derive(Debug, Clone, Error, Serialize)]
#[error("{kind}: {detail}")]
pub struct IngestError {
    pub kind: ErrorKind,
    pub detail: String,
}

impl IngestError {
    pub fn new(kind: ErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }
}

/// Outcome of a single ingestion
pub type IngestResult = std::result::Result<StagedAsset, IngestError>;
