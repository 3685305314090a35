//! Filesystem trait for pluggable storage backends.

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;

use crate::result::AppResult;

/// Whether a filesystem entry is a file or a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// A regular file.
    File,
    /// A directory.
    Directory,
}

/// Metadata about a filesystem entry.
///
/// `name` is the full path of the entry within the filesystem it was
/// obtained from. For a sandboxed view this is always relative to the
/// view's root.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct FsEntry {
    /// Path of the entry within the filesystem.
    pub name: String,
    /// Entry kind.
    #[serde(rename = "type")]
    pub kind: EntryKind,
    /// Size in bytes (0 for directories on backends that do not report it).
    pub size_bytes: u64,
    /// MIME type (if known).
    pub mime_type: Option<String>,
    /// Last modified timestamp.
    pub last_modified: Option<chrono::DateTime<chrono::Utc>>,
    /// Content checksum (if available).
    pub checksum: Option<String>,
}

impl FsEntry {
    /// Returns the last path segment of the entry.
    pub fn base_name(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }

    /// Returns whether the entry is a directory.
    pub fn is_directory(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// Options for directory creation.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct MkdirOptions {
    /// Create missing parent directories.
    pub create_parents: bool,
    /// Backend-specific creation options, passed through opaquely.
    #[serde(default)]
    pub backend_options: serde_json::Value,
}

impl MkdirOptions {
    /// Options that create missing parents and nothing else.
    pub fn with_parents() -> Self {
        Self {
            create_parents: true,
            backend_options: serde_json::Value::Null,
        }
    }
}

/// A byte stream type used for reading file contents.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>;

/// Trait for filesystem backends.
///
/// Implementations exist for the local filesystem and, behind cargo
/// features, S3-compatible object stores and WebDAV servers. The trait is
/// defined here in `foldergate-core` and implemented in
/// `foldergate-storage`, which also provides the sandboxed
/// `RootedFileSystem` decorator over any implementation.
#[async_trait]
pub trait FileSystem: Send + Sync + std::fmt::Debug + 'static {
    /// Return the protocol name (e.g., "local", "s3", "webdav").
    fn protocol(&self) -> &str;

    /// Path separator used by this filesystem.
    fn sep(&self) -> char {
        '/'
    }

    /// Check whether the backend is healthy and reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Check whether a file or directory exists at the given path.
    async fn exists(&self, path: &str) -> AppResult<bool>;

    /// Get metadata about a file or directory.
    async fn info(&self, path: &str) -> AppResult<FsEntry>;

    /// List the contents of a directory with full metadata.
    async fn list(&self, path: &str) -> AppResult<Vec<FsEntry>>;

    /// Create a directory.
    async fn mkdir(&self, path: &str, options: &MkdirOptions) -> AppResult<()>;

    /// Move (rename) a file or directory within this filesystem.
    async fn rename(&self, from: &str, to: &str) -> AppResult<()>;

    /// Copy a file, or a directory tree when `recursive` is set.
    async fn copy(&self, from: &str, to: &str, recursive: bool) -> AppResult<()>;

    /// Remove a file, or a directory tree when `recursive` is set.
    async fn rm(&self, path: &str, recursive: bool) -> AppResult<()>;

    /// Read a file and return its byte stream.
    async fn read(&self, path: &str) -> AppResult<ByteStream>;

    /// Read a file into memory as a complete byte vector.
    async fn read_bytes(&self, path: &str) -> AppResult<Bytes>;

    /// Write bytes to a file, creating it (and missing parents) if needed
    /// and overwriting any existing content.
    async fn write_bytes(&self, path: &str, data: Bytes) -> AppResult<()>;

    /// Content checksum of a file, if the backend can provide one.
    async fn checksum(&self, path: &str) -> AppResult<Option<String>>;
}
