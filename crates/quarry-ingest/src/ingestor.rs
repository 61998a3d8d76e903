//! The asset ingestion pipeline
//!
//! `ingest` resolves metadata, picks the staging extension, opens the
//! source, classifies the format, streams the bytes into a fresh staging
//! file and sniffs GLB headers. Every failure comes back as an
//! `IngestError`; a partially written staging file never survives one.

use crate::classify::staging_extension;
use crate::config::{IngestConfig, DEFAULT_CHUNK_SIZE};
use crate::glb::{self, GLB_HEADER_LEN};
use crate::loader::ModelLoader;
use crate::source::{ByteSource, LocalFileSource, MetadataResolver};
use crate::staging::{StagingDirectory, StagingFile};
use crate::types::{ErrorKind, IngestError, IngestResult, ModelFormat, ResourceHandle, StagedAsset};
use quarry_core::{ContentHash, ContentHasher};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::JoinHandle;

/// A staged asset together with the model a loader built from it
#[derive(Debug)]
pub struct Loaded<M> {
    pub asset: StagedAsset,
    pub model: M,
}

/// Copies caller content into the staging area and validates it.
///
/// Holds no per-ingestion state, so one ingestor can serve any number of
/// concurrent calls. Cloning is cheap.
#[derive(Clone)]
pub struct AssetIngestor {
    resolver: Arc<dyn MetadataResolver>,
    source: Arc<dyn ByteSource>,
    staging: Arc<dyn StagingDirectory>,
    chunk_size: usize,
}

impl AssetIngestor {
    pub fn new(
        resolver: impl MetadataResolver + 'static,
        source: impl ByteSource + 'static,
        staging: impl StagingDirectory + 'static,
    ) -> Self {
        Self {
            resolver: Arc::new(resolver),
            source: Arc::new(source),
            staging: Arc::new(staging),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Ingestor reading local files and staging into the configured directory
    pub fn local(config: &IngestConfig) -> Self {
        let source = Arc::new(LocalFileSource::new());
        Self {
            resolver: source.clone(),
            source,
            staging: Arc::new(config.staging()),
            chunk_size: config.chunk_size,
        }
    }

    /// Replace the metadata resolver, keeping the byte source and staging area
    pub fn with_resolver(mut self, resolver: impl MetadataResolver + 'static) -> Self {
        self.resolver = Arc::new(resolver);
        self
    }

    /// Set the copy buffer size; zero is treated as one byte
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Ingest one resource into the staging area
    pub fn ingest(&self, handle: &ResourceHandle) -> IngestResult {
        let result = self.run(handle);
        match &result {
            Ok(asset) => tracing::info!(
                handle = %handle,
                path = %asset.local_path.display(),
                bytes = asset.byte_length,
                format = %asset.format,
                digest = %asset.digest,
                warnings = asset.warnings.len(),
                "staged model"
            ),
            Err(err) => tracing::debug!(handle = %handle, kind = %err.kind, detail = %err.detail, "ingestion failed"),
        }
        result
    }

    /// Ingest, then pass the staged asset to `loader`.
    ///
    /// A loader failure leaves the staged file in place; the error detail
    /// names it so the caller can retry the load or release the file.
    pub fn ingest_and_load<L: ModelLoader>(
        &self,
        handle: &ResourceHandle,
        loader: &L,
    ) -> Result<Loaded<L::Model>, IngestError> {
        let asset = self.ingest(handle)?;
        match loader.load(&asset) {
            Ok(model) => Ok(Loaded { asset, model }),
            Err(e) => Err(IngestError::new(
                ErrorKind::LoadFailed,
                format!("{} ({})", e, asset.local_path.display()),
            )),
        }
    }

    /// Run one ingestion on a worker thread
    pub fn spawn(&self, handle: ResourceHandle) -> JoinHandle<IngestResult> {
        let ingestor = self.clone();
        std::thread::spawn(move || ingestor.ingest(&handle))
    }

    fn run(&self, handle: &ResourceHandle) -> IngestResult {
        let metadata = self.resolver.resolve(handle);
        let extension = staging_extension(&metadata);
        tracing::debug!(
            handle = %handle,
            name = ?metadata.display_name,
            mime = ?metadata.mime_hint,
            extension = %extension,
            "resolved metadata"
        );

        let mut source = self.source.open(handle).map_err(|e| {
            IngestError::new(
                ErrorKind::SourceUnavailable,
                format!("cannot open {}: {}", handle, e),
            )
        })?;

        let format = ModelFormat::from_extension(&extension);
        if !format.is_supported() {
            return Err(IngestError::new(
                ErrorKind::UnsupportedFormat,
                format!("'.{}' is not a GLB or glTF file", extension),
            ));
        }

        let copied = self.stage(&mut *source, &extension)?;

        let (header, warnings) = match format {
            ModelFormat::Glb => glb::sniff(&copied.leading, copied.byte_length),
            _ => (None, Vec::new()),
        };

        Ok(StagedAsset {
            local_path: copied.path,
            byte_length: copied.byte_length,
            format,
            digest: copied.digest,
            header,
            warnings,
        })
    }

    fn stage(&self, source: &mut dyn Read, extension: &str) -> Result<Copied, IngestError> {
        let StagingFile { path, writer } =
            self.staging.create_unique_file(extension).map_err(|e| {
                IngestError::new(
                    ErrorKind::CopyFailed,
                    format!("cannot create staging file: {}", e),
                )
            })?;
        tracing::debug!(path = %path.display(), "created staging file");

        // Declared before the writer so the writer is closed first on unwind
        let pending = PendingFile::new(self.staging.as_ref(), path);
        let mut writer = writer;

        let stats = copy_stream(source, &mut writer, self.chunk_size).map_err(|e| {
            IngestError::new(
                ErrorKind::CopyFailed,
                format!("copy into {} failed: {}", pending.path().display(), e),
            )
        })?;
        drop(writer);

        Ok(Copied {
            path: pending.keep(),
            byte_length: stats.byte_length,
            digest: stats.digest,
            leading: stats.leading,
        })
    }
}

struct Copied {
    path: PathBuf,
    byte_length: u64,
    digest: ContentHash,
    leading: Vec<u8>,
}

/// Staging file that is removed on drop unless kept
struct PendingFile<'a> {
    staging: &'a dyn StagingDirectory,
    path: Option<PathBuf>,
}

impl<'a> PendingFile<'a> {
    fn new(staging: &'a dyn StagingDirectory, path: PathBuf) -> Self {
        Self {
            staging,
            path: Some(path),
        }
    }

    fn path(&self) -> &Path {
        self.path.as_deref().unwrap_or(Path::new(""))
    }

    fn keep(mut self) -> PathBuf {
        self.path.take().unwrap_or_default()
    }
}

impl Drop for PendingFile<'_> {
    fn drop(&mut self) {
        if let Some(path) = self.path.take() {
            if let Err(e) = self.staging.remove(&path) {
                tracing::warn!(path = %path.display(), error = %e, "failed to remove partial staging file");
            }
        }
    }
}

struct CopyStats {
    byte_length: u64,
    digest: ContentHash,
    /// Up to the first `GLB_HEADER_LEN` bytes
    leading: Vec<u8>,
}

/// Stream `reader` into `writer` in `chunk_size` pieces, hashing as it goes
fn copy_stream<R, W>(reader: &mut R, writer: &mut W, chunk_size: usize) -> io::Result<CopyStats>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut buf = vec![0u8; chunk_size.max(1)];
    let mut hasher = ContentHasher::new();
    let mut leading = Vec::with_capacity(GLB_HEADER_LEN);
    let mut byte_length = 0u64;

    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        let chunk = &buf[..n];
        writer.write_all(chunk)?;
        hasher.update(chunk);
        if leading.len() < GLB_HEADER_LEN {
            let take = (GLB_HEADER_LEN - leading.len()).min(n);
            leading.extend_from_slice(&chunk[..take]);
        }
        byte_length += n as u64;
    }
    writer.flush()?;

    Ok(CopyStats {
        byte_length,
        digest: hasher.finish(),
        leading,
    })
}
