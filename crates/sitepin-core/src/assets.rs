//! # Asset Collector
//!
//! Recursively enumerates every regular file below the site's build
//! directory. Symlinks are followed; hidden files and permissions are passed
//! through untouched. The resulting [`AssetSet`] is consumed once by the
//! pinning uploader and then dropped.

use std::path::{Component, Path, PathBuf};

use walkdir::WalkDir;

use crate::error::CoreError;

/// Folder name used when the root has no final path component (e.g. `/`).
const FALLBACK_FOLDER_NAME: &str = "site";

/// A single file to upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Absolute (or root-joined) path on disk.
    pub absolute: PathBuf,
    /// Path relative to the upload root, `/`-separated.
    pub relative: String,
}

/// Every file found below an upload root.
#[derive(Debug, Clone)]
pub struct AssetSet {
    root: PathBuf,
    folder_name: String,
    files: Vec<FileEntry>,
}

impl AssetSet {
    /// Directory the files were collected from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Final component of the root, used as the top-level folder name of
    /// the upload so that the returned CID addresses the whole directory.
    pub fn folder_name(&self) -> &str {
        &self.folder_name
    }

    /// Collected files, sorted by relative path.
    pub fn files(&self) -> &[FileEntry] {
        &self.files
    }

    /// Number of collected files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// True when the root contains no regular files.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Walk `root` and collect every regular file beneath it.
///
/// # Errors
///
/// Returns [`CoreError::Io`] if the root is missing or any directory below
/// it cannot be read, and [`CoreError::NotADirectory`] if the root is a file.
/// An empty directory is not an error: the returned set is simply empty.
pub fn collect_assets(root: impl AsRef<Path>) -> Result<AssetSet, CoreError> {
    let root = root.as_ref();
    let metadata = std::fs::metadata(root).map_err(|source| CoreError::Io {
        path: root.to_path_buf(),
        source,
    })?;
    if !metadata.is_dir() {
        return Err(CoreError::NotADirectory {
            path: root.to_path_buf(),
        });
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(true) {
        let entry = entry.map_err(|e| CoreError::Io {
            path: e.path().unwrap_or(root).to_path_buf(),
            source: e.into(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(relative) = relative_path(root, entry.path()) else {
            continue;
        };
        tracing::trace!(file = %relative, "collected asset");
        files.push(FileEntry {
            absolute: entry.into_path(),
            relative,
        });
    }
    files.sort_by(|a, b| a.relative.cmp(&b.relative));

    tracing::debug!(root = %root.display(), files = files.len(), "asset collection complete");

    Ok(AssetSet {
        root: root.to_path_buf(),
        folder_name: folder_name(root),
        files,
    })
}

/// Path of `path` below `root`, joined with `/` regardless of platform.
fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let stripped = path.strip_prefix(root).ok()?;
    let parts: Vec<_> = stripped
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

fn folder_name(root: &Path) -> String {
    let named = |p: &Path| {
        p.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .filter(|n| !n.is_empty())
    };
    named(root)
        .or_else(|| root.canonicalize().ok().as_deref().and_then(named))
        .unwrap_or_else(|| FALLBACK_FOLDER_NAME.to_string())
}
