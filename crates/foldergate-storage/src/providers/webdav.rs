//! WebDAV client provider (requires the `webdav-client` feature).

use async_trait::async_trait;
use bytes::Bytes;

use foldergate_core::error::AppError;
use foldergate_core::result::AppResult;
use foldergate_core::traits::filesystem::{ByteStream, FileSystem, FsEntry, MkdirOptions};

/// WebDAV client filesystem provider.
///
/// Only connectivity is wired up so far; the DAV operations are pending.
#[derive(Debug, Clone)]
pub struct WebDavFileSystem {
    client: reqwest::Client,
    base_url: String,
    username: String,
    password: String,
}

impl WebDavFileSystem {
    /// Create a new WebDAV provider against the given base URL.
    pub fn new(base_url: &str, username: &str, password: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            username: username.to_string(),
            password: password.to_string(),
        }
    }
}

#[async_trait]
impl FileSystem for WebDavFileSystem {
    fn protocol(&self) -> &str {
        "webdav"
    }

    async fn health_check(&self) -> AppResult<bool> {
        let response = self
            .client
            .request(reqwest::Method::OPTIONS, &self.base_url)
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await;
        Ok(response.map(|r| r.status().is_success()).unwrap_or(false))
    }

    async fn exists(&self, _path: &str) -> AppResult<bool> {
        Err(AppError::not_implemented(
            "WebDAV exists not yet implemented",
        ))
    }

    async fn info(&self, _path: &str) -> AppResult<FsEntry> {
        Err(AppError::not_implemented("WebDAV info not yet implemented"))
    }

    async fn list(&self, _path: &str) -> AppResult<Vec<FsEntry>> {
        Err(AppError::not_implemented("WebDAV list not yet implemented"))
    }

    async fn mkdir(&self, _path: &str, _options: &MkdirOptions) -> AppResult<()> {
        Err(AppError::not_implemented(
            "WebDAV mkdir not yet implemented",
        ))
    }

    async fn rename(&self, _from: &str, _to: &str) -> AppResult<()> {
        Err(AppError::not_implemented(
            "WebDAV rename not yet implemented",
        ))
    }

    async fn copy(&self, _from: &str, _to: &str, _recursive: bool) -> AppResult<()> {
        Err(AppError::not_implemented("WebDAV copy not yet implemented"))
    }

    async fn rm(&self, _path: &str, _recursive: bool) -> AppResult<()> {
        Err(AppError::not_implemented("WebDAV rm not yet implemented"))
    }

    async fn read(&self, _path: &str) -> AppResult<ByteStream> {
        Err(AppError::not_implemented("WebDAV read not yet implemented"))
    }

    async fn read_bytes(&self, _path: &str) -> AppResult<Bytes> {
        Err(AppError::not_implemented(
            "WebDAV read_bytes not yet implemented",
        ))
    }

    async fn write_bytes(&self, _path: &str, _data: Bytes) -> AppResult<()> {
        Err(AppError::not_implemented(
            "WebDAV write_bytes not yet implemented",
        ))
    }

    async fn checksum(&self, _path: &str) -> AppResult<Option<String>> {
        Err(AppError::not_implemented(
            "WebDAV checksum not yet implemented",
        ))
    }
}
