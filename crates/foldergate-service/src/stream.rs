//! Content streaming out of a sandboxed folder.

use chrono::{DateTime, Utc};

use foldergate_core::error::AppError;
use foldergate_core::result::AppResult;
use foldergate_core::traits::filesystem::{ByteStream, FileSystem};
use foldergate_storage::sandbox::RootedFileSystem;

/// A file opened for HTTP streaming, together with the metadata needed
/// for content negotiation and caching.
pub struct ContentStream {
    /// Suggested filename for Content-Disposition.
    pub filename: String,
    /// MIME type for Content-Type.
    pub mime_type: String,
    /// Content length in bytes.
    pub size_bytes: u64,
    /// Content checksum, used as the ETag when available.
    pub etag: Option<String>,
    /// Last modification time.
    pub last_modified: Option<DateTime<Utc>>,
    /// The content bytes.
    pub stream: ByteStream,
}

impl std::fmt::Debug for ContentStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentStream")
            .field("filename", &self.filename)
            .field("mime_type", &self.mime_type)
            .field("size_bytes", &self.size_bytes)
            .field("etag", &self.etag)
            .finish()
    }
}

impl ContentStream {
    /// Open a file of a sandboxed folder for streaming.
    ///
    /// Fails validation when the path is not a regular file. The checksum
    /// is best-effort: backends that cannot provide one yield no ETag.
    pub async fn from_sandbox(fs: &RootedFileSystem, path: &str) -> AppResult<Self> {
        let entry = fs.info(path).await?;
        if entry.is_directory() {
            return Err(AppError::validation("Content is not a file"));
        }

        let filename = entry.base_name().to_string();
        let mime_type = entry
            .mime_type
            .clone()
            .unwrap_or_else(|| "application/octet-stream".to_string());
        let etag = fs.checksum(path).await.unwrap_or(None);
        let stream = fs.read(path).await?;

        Ok(Self {
            filename,
            mime_type,
            size_bytes: entry.size_bytes,
            etag,
            last_modified: entry.last_modified,
            stream,
        })
    }
}
