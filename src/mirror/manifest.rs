use crate::mirror::{is_metadata_file, read_content_type, MirrorError};
use jwalk::WalkDir;
use std::path::{Component, Path, PathBuf};

/// Leading directory that stands for the bucket root in object keys
const ROOT_PLACEHOLDER: &str = "$root/";

/// One object of the mirror as the upload pass sees it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorObject {
    /// Object-store key: the path relative to the mirror root with `/` separators
    pub key: String,
    /// Local file
    pub path: PathBuf,
    /// Content type declared by the sidecar, if any
    pub content_type: Option<String>,
}

/// Every object found under a mirror root
#[derive(Debug, Clone, Default)]
pub struct MirrorManifest {
    pub objects: Vec<MirrorObject>,
}

impl MirrorManifest {
    /// Objects that carry a content type and would be uploaded
    pub fn uploadable(&self) -> impl Iterator<Item = &MirrorObject> {
        self.objects.iter().filter(|o| o.content_type.is_some())
    }

    /// Objects the upload pass would skip
    pub fn missing_metadata(&self) -> impl Iterator<Item = &MirrorObject> {
        self.objects.iter().filter(|o| o.content_type.is_none())
    }
}

/// Derives the object key of `path` relative to `root`
///
/// Returns `None` when `path` is not under `root`.
pub fn object_key(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let key = relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/");

    Some(match key.strip_prefix(ROOT_PLACEHOLDER) {
        Some(stripped) => stripped.to_string(),
        None => key,
    })
}

/// Walks the mirror tree and pairs every object with its sidecar
///
/// Sidecars themselves are not objects. An object without a usable
/// `Content-Type` is logged as a warning and reported in
/// [`MirrorManifest::missing_metadata`].
pub fn scan_mirror(root: &Path) -> Result<MirrorManifest, MirrorError> {
    let mut manifest = MirrorManifest::default();

    for entry in WalkDir::new(root).sort(true) {
        let entry = entry.map_err(|e| MirrorError::Walk(e.to_string()))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if is_metadata_file(&path) {
            continue;
        }

        let Some(key) = object_key(root, &path) else {
            continue;
        };

        let content_type = read_content_type(&path)?;
        if content_type.is_none() {
            tracing::warn!("No Content-Type found for {}", path.display());
        }

        manifest.objects.push(MirrorObject {
            key,
            path,
            content_type,
        });
    }

    tracing::debug!("Scanned {} objects under {}", manifest.objects.len(), root.display());
    Ok(manifest)
}
