//! The on-disk mirror and its sidecar metadata contract
//!
//! Every archived object is a file plus a `<file>.metadata` sidecar holding
//! exactly one line, `Content-Type: <value>`. The object-store upload pass walks
//! the tree, pairs each object with its sidecar and uploads it with the declared
//! content type; objects without one are skipped with a warning.

mod manifest;

pub use manifest::{object_key, scan_mirror, MirrorManifest, MirrorObject};

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Suffix of sidecar metadata files
pub const METADATA_SUFFIX: &str = ".metadata";

const CONTENT_TYPE_PREFIX: &str = "Content-Type:";

/// Errors raised while reading or writing the mirror
#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to walk mirror tree: {0}")]
    Walk(String),
}

impl MirrorError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Content bytes and their declared content type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedObject {
    pub content: Vec<u8>,
    pub content_type: String,
}

impl DownloadedObject {
    pub fn new(content: Vec<u8>, content_type: impl Into<String>) -> Self {
        Self {
            content,
            content_type: content_type.into(),
        }
    }

    /// Writes the object and its sidecar, creating parent directories
    pub fn persist(&self, path: &Path) -> Result<(), MirrorError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| MirrorError::io(parent, e))?;
        }
        fs::write(path, &self.content).map_err(|e| MirrorError::io(path, e))?;
        write_metadata(path, &self.content_type)
    }
}

/// Returns the sidecar path of an object: the file name with `.metadata` appended
pub fn metadata_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(METADATA_SUFFIX);
    PathBuf::from(name)
}

/// Returns true when `path` names a sidecar file
pub fn is_metadata_file(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().ends_with(METADATA_SUFFIX))
        .unwrap_or(false)
}

/// Writes `Content-Type: <value>\n` next to `path`
pub fn write_metadata(path: &Path, content_type: &str) -> Result<(), MirrorError> {
    let sidecar = metadata_path(path);
    fs::write(&sidecar, format!("{} {}\n", CONTENT_TYPE_PREFIX, content_type))
        .map_err(|e| MirrorError::io(&sidecar, e))
}

/// Reads the declared content type of the object at `path`
///
/// Returns `Ok(None)` when the sidecar is missing or declares nothing usable.
pub fn read_content_type(path: &Path) -> Result<Option<String>, MirrorError> {
    let sidecar = metadata_path(path);
    let text = match fs::read_to_string(&sidecar) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(MirrorError::io(&sidecar, e)),
    };

    Ok(text
        .lines()
        .find_map(|line| line.strip_prefix(CONTENT_TYPE_PREFIX))
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty()))
}
