//! Staging area for ingested model files

use quarry_core::{QuarryError, Result};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Prefix given to staged file names unless configured otherwise
pub const DEFAULT_PREFIX: &str = "ar_model_";

/// A freshly created staging file, open for writing
pub struct StagingFile {
    pub path: PathBuf,
    pub writer: Box<dyn Write + Send>,
}

/// Allocates uniquely named staging files
pub trait StagingDirectory: Send + Sync {
    /// Create a new file carrying `extension` (without the dot) whose name
    /// collides with no other staging file
    fn create_unique_file(&self, extension: &str) -> io::Result<StagingFile>;

    /// Delete a staging file; missing files are not an error
    fn remove(&self, path: &Path) -> io::Result<()>;
}

/// Staging files kept in a directory on disk
///
/// Files are named `<prefix><uuid>.<ext>` directly under the root.
#[derive(Debug, Clone)]
pub struct TempStagingDir {
    root: PathBuf,
    prefix: String,
}

impl TempStagingDir {
    /// Create a staging area at the given root directory
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            prefix: DEFAULT_PREFIX.to_string(),
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// `<system temp>/quarry-staging`
    pub fn default_root() -> PathBuf {
        std::env::temp_dir().join("quarry-staging")
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// List staged files belonging to this area
    pub fn list(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        if !self.root.exists() {
            return Ok(files);
        }

        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let owned = entry
                .file_name()
                .to_str()
                .map(|n| self.is_staged_name(n))
                .unwrap_or(false);
            if owned {
                files.push(entry.path());
            }
        }

        files.sort();
        Ok(files)
    }

    /// Delete every staged file, returning how many were removed
    pub fn purge(&self) -> Result<usize> {
        let files = self.list()?;
        for path in &files {
            fs::remove_file(path).map_err(|e| {
                QuarryError::StagingError(format!("Failed to remove {}: {}", path.display(), e))
            })?;
        }
        tracing::debug!(count = files.len(), root = %self.root.display(), "purged staging area");
        Ok(files.len())
    }

    fn unique_name(&self, extension: &str) -> String {
        format!("{}{}.{}", self.prefix, uuid::Uuid::new_v4().simple(), extension)
    }

    /// Whether `name` has the `<prefix><32 hex>.<ext>` shape of `unique_name`
    fn is_staged_name(&self, name: &str) -> bool {
        let Some(rest) = name.strip_prefix(&self.prefix) else {
            return false;
        };
        let Some((id, extension)) = rest.split_once('.') else {
            return false;
        };
        id.len() == 32
            && id.bytes().all(|b| b.is_ascii_hexdigit())
            && !extension.is_empty()
    }

    /// Whether `path` is a staged file directly under this root
    fn owns(&self, path: &Path) -> bool {
        path.parent() == Some(self.root.as_path())
            && path
                .file_name()
                .and_then(|n| n.to_str())
                .map(|n| self.is_staged_name(n))
                .unwrap_or(false)
    }
}

impl Default for TempStagingDir {
    fn default() -> Self {
        Self::new(Self::default_root())
    }
}

impl StagingDirectory for TempStagingDir {
    fn create_unique_file(&self, extension: &str) -> io::Result<StagingFile> {
        fs::create_dir_all(&self.root)?;
        let path = self.root.join(self.unique_name(extension));
        // create_new refuses to reuse a name even if a UUID ever repeated
        let file = OpenOptions::new().write(true).create_new(true).open(&path)?;
        Ok(StagingFile {
            path,
            writer: Box::new(file),
        })
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        if !self.owns(path) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a staged file under {}", path.display(), self.root.display()),
            ));
        }
        match fs::remove_file(path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}
