//! Content capabilities consumed by the ingestor
//!
//! Hosts implement `MetadataResolver` and `ByteSource` for their own kind of
//! handle. `LocalFileSource` covers plain paths and `file://` URIs.

use crate::types::{ResolvedMetadata, ResourceHandle};
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use url::Url;

/// Resolves display name and MIME hints for a handle
pub trait MetadataResolver: Send + Sync {
    fn resolve_name(&self, handle: &ResourceHandle) -> Option<String>;

    fn resolve_mime_type(&self, handle: &ResourceHandle) -> Option<String>;

    /// Resolve both hints at once
    fn resolve(&self, handle: &ResourceHandle) -> ResolvedMetadata {
        ResolvedMetadata {
            display_name: self.resolve_name(handle),
            mime_hint: self.resolve_mime_type(handle),
        }
    }
}

/// Opens a readable byte stream for a handle
pub trait ByteSource: Send + Sync {
    fn open(&self, handle: &ResourceHandle) -> io::Result<Box<dyn Read + Send>>;
}

/// Resolves handles against the local filesystem
#[derive(Debug, Clone, Default)]
pub struct LocalFileSource {
    base: Option<PathBuf>,
}

impl LocalFileSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative handles against `base` instead of the working directory
    pub fn with_base<P: AsRef<Path>>(base: P) -> Self {
        Self {
            base: Some(base.as_ref().to_path_buf()),
        }
    }

    /// Filesystem path a handle refers to
    pub fn path_for(&self, handle: &ResourceHandle) -> PathBuf {
        let raw = handle.as_str();
        if let Ok(uri) = Url::parse(raw) {
            if uri.scheme() == "file" {
                if let Ok(path) = uri.to_file_path() {
                    return path;
                }
            }
        }

        let path = Path::new(raw);
        match &self.base {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl MetadataResolver for LocalFileSource {
    fn resolve_name(&self, handle: &ResourceHandle) -> Option<String> {
        self.path_for(handle)
            .file_name()
            .and_then(|n| n.to_str())
            .map(String::from)
    }

    fn resolve_mime_type(&self, handle: &ResourceHandle) -> Option<String> {
        mime_guess::from_path(self.path_for(handle))
            .first_raw()
            .map(ToOwned::to_owned)
    }
}

impl ByteSource for LocalFileSource {
    fn open(&self, handle: &ResourceHandle) -> io::Result<Box<dyn Read + Send>> {
        let path = self.path_for(handle);
        if path.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is a directory", path.display()),
            ));
        }
        let file = File::open(&path)?;
        Ok(Box::new(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("quarry_source_test_{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_path_for_file_uri() {
        let source = LocalFileSource::new();
        let path = source.path_for(&ResourceHandle::new("file:///tmp/models/chair.glb"));
        assert_eq!(path, PathBuf::from("/tmp/models/chair.glb"));
    }

    #[test]
    fn test_path_for_localhost_uri() {
        let source = LocalFileSource::new();
        let path = source.path_for(&ResourceHandle::new("file://localhost/tmp/models/chair.glb"));
        assert_eq!(path, PathBuf::from("/tmp/models/chair.glb"));
    }

    #[test]
    fn test_open_percent_encoded_uri() {
        let dir = temp_dir();
        let path = dir.join("my model.glb");
        fs::write(&path, b"glTF").unwrap();

        let uri = Url::from_file_path(&path).unwrap();
        assert!(uri.as_str().contains("my%20model.glb"));

        let source = LocalFileSource::new();
        let handle = ResourceHandle::new(uri.as_str());
        assert_eq!(source.path_for(&handle), path);
        assert_eq!(source.resolve_name(&handle).as_deref(), Some("my model.glb"));
        assert!(source.open(&handle).is_ok());

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_path_for_relative_with_base() {
        let source = LocalFileSource::with_base("/srv/assets");
        let path = source.path_for(&ResourceHandle::new("chair.glb"));
        assert_eq!(path, PathBuf::from("/srv/assets/chair.glb"));
    }

    #[test]
    fn test_resolve_name() {
        let source = LocalFileSource::new();
        let meta = source.resolve(&ResourceHandle::new("some/dir/Model.GLB"));
        assert_eq!(meta.display_name.as_deref(), Some("Model.GLB"));
    }

    #[test]
    fn test_resolve_mime_for_text() {
        let source = LocalFileSource::new();
        let mime = source.resolve_mime_type(&ResourceHandle::new("notes.txt"));
        assert_eq!(mime.as_deref(), Some("text/plain"));
    }

    #[test]
    fn test_open_reads_content() {
        let dir = temp_dir();
        let path = dir.join("cube.glb");
        fs::write(&path, b"glTF-bytes").unwrap();

        let source = LocalFileSource::new();
        let mut reader = source.open(&ResourceHandle::from_path(&path)).unwrap();
        let mut content = Vec::new();
        reader.read_to_end(&mut content).unwrap();
        assert_eq!(content, b"glTF-bytes");

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_open_missing_and_directory() {
        let dir = temp_dir();
        let source = LocalFileSource::new();
        assert!(source.open(&ResourceHandle::from_path(dir.join("absent.glb"))).is_err());
        assert!(source.open(&ResourceHandle::from_path(&dir)).is_err());
        fs::remove_dir_all(&dir).ok();
    }
}
