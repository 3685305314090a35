//! Sandboxed filesystem view rooted at a folder reference.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use foldergate_core::error::AppError;
use foldergate_core::result::AppResult;
use foldergate_core::traits::filesystem::{
    ByteStream, FileSystem, FsEntry, MkdirOptions,
};

/// A filesystem view rooted at a directory of another filesystem.
///
/// Every path passed through this view is interpreted relative to the
/// root — a leading `/` refers to the view's root, never to the backing
/// filesystem's root — and any attempt to escape it (via `..`) fails.
/// Entry names in results are re-based so that callers never see the real
/// backend path; the root itself reports an empty name.
///
/// The view is ephemeral: it is constructed on demand from a folder-field
/// value and owns no state beyond the backing filesystem handle.
#[derive(Debug, Clone)]
pub struct RootedFileSystem {
    inner: Arc<dyn FileSystem>,
    root: String,
}

impl RootedFileSystem {
    /// Create a view over `inner` rooted at `root`.
    ///
    /// The root itself is normalized and must not contain `..` segments.
    pub fn new(inner: Arc<dyn FileSystem>, root: &str) -> AppResult<Self> {
        let root = normalize(root)?;
        Ok(Self { inner, root })
    }

    /// The root path of this view within the backing filesystem.
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Resolve a caller-supplied path to a path on the backing filesystem.
    fn resolve(&self, path: &str) -> AppResult<String> {
        let rel = normalize(path)?;
        if self.root.is_empty() {
            return Ok(rel);
        }
        if rel.is_empty() {
            return Ok(self.root.clone());
        }
        Ok(format!("{}/{rel}", self.root))
    }

    /// Translate a backing-filesystem entry name back into the view.
    ///
    /// Returns `None` for names outside the root, which are dropped from
    /// results rather than leaked.
    fn rebase(&self, name: &str) -> Option<String> {
        let name = name.trim_start_matches('/');
        if self.root.is_empty() {
            return Some(name.to_string());
        }
        if name == self.root {
            return Some(String::new());
        }
        name.strip_prefix(&self.root)
            .and_then(|rest| rest.strip_prefix('/'))
            .map(str::to_string)
    }

    /// Re-base a returned entry into the view's coordinate space.
    fn rebase_entry(&self, mut entry: FsEntry) -> Option<FsEntry> {
        entry.name = self.rebase(&entry.name)?;
        Some(entry)
    }
}

#[async_trait]
impl FileSystem for RootedFileSystem {
    fn protocol(&self) -> &str {
        self.inner.protocol()
    }

    fn sep(&self) -> char {
        self.inner.sep()
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }

    async fn exists(&self, path: &str) -> AppResult<bool> {
        let full = self.resolve(path)?;
        self.inner.exists(&full).await
    }

    async fn info(&self, path: &str) -> AppResult<FsEntry> {
        let full = self.resolve(path)?;
        let entry = self.inner.info(&full).await?;
        Ok(self
            .rebase_entry(entry)
            .unwrap_or_else(|| FsEntry {
                name: String::new(),
                kind: foldergate_core::traits::filesystem::EntryKind::Directory,
                size_bytes: 0,
                mime_type: None,
                last_modified: None,
                checksum: None,
            }))
    }

    async fn list(&self, path: &str) -> AppResult<Vec<FsEntry>> {
        let full = self.resolve(path)?;
        let entries = self.inner.list(&full).await?;
        Ok(entries
            .into_iter()
            .filter_map(|e| self.rebase_entry(e))
            .collect())
    }

    async fn mkdir(&self, path: &str, options: &MkdirOptions) -> AppResult<()> {
        let full = self.resolve(path)?;
        self.inner.mkdir(&full, options).await
    }

    async fn rename(&self, from: &str, to: &str) -> AppResult<()> {
        let from = self.resolve(from)?;
        let to = self.resolve(to)?;
        self.inner.rename(&from, &to).await
    }

    async fn copy(&self, from: &str, to: &str, recursive: bool) -> AppResult<()> {
        let from = self.resolve(from)?;
        let to = self.resolve(to)?;
        self.inner.copy(&from, &to, recursive).await
    }

    async fn rm(&self, path: &str, recursive: bool) -> AppResult<()> {
        let full = self.resolve(path)?;
        self.inner.rm(&full, recursive).await
    }

    async fn read(&self, path: &str) -> AppResult<ByteStream> {
        let full = self.resolve(path)?;
        self.inner.read(&full).await
    }

    async fn read_bytes(&self, path: &str) -> AppResult<Bytes> {
        let full = self.resolve(path)?;
        self.inner.read_bytes(&full).await
    }

    async fn write_bytes(&self, path: &str, data: Bytes) -> AppResult<()> {
        let full = self.resolve(path)?;
        self.inner.write_bytes(&full, data).await
    }

    async fn checksum(&self, path: &str) -> AppResult<Option<String>> {
        let full = self.resolve(path)?;
        self.inner.checksum(&full).await
    }
}

/// Normalize a path to a clean relative form.
///
/// Leading slashes and empty or `.` segments are dropped; `..` segments are
/// rejected since they could reach outside the root.
fn normalize(path: &str) -> AppResult<String> {
    let mut segments = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                return Err(AppError::access_denied(format!(
                    "Path escapes the folder root: {path}"
                )));
            }
            other => segments.push(other),
        }
    }
    Ok(segments.join("/"))
}
