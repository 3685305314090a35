//! S3-compatible object storage provider (requires the `s3` feature).

use async_trait::async_trait;
use bytes::Bytes;

use foldergate_core::error::AppError;
use foldergate_core::result::AppResult;
use foldergate_core::traits::filesystem::{ByteStream, FileSystem, FsEntry, MkdirOptions};

/// S3-compatible filesystem provider.
///
/// Only connectivity is wired up so far; the object operations are pending.
#[derive(Debug, Clone)]
pub struct S3FileSystem {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3FileSystem {
    /// Create a new S3 provider for the given bucket.
    pub async fn new(
        endpoint: &str,
        region: &str,
        bucket: &str,
        access_key: &str,
        secret_key: &str,
    ) -> AppResult<Self> {
        tracing::info!(endpoint, region, bucket, "Initializing S3 filesystem");

        let credentials = aws_sdk_s3::config::Credentials::new(
            access_key,
            secret_key,
            None,
            None,
            "foldergate",
        );
        let mut builder = aws_sdk_s3::config::Builder::new()
            .behavior_version(aws_sdk_s3::config::BehaviorVersion::latest())
            .region(aws_sdk_s3::config::Region::new(region.to_string()))
            .credentials_provider(credentials);
        if !endpoint.is_empty() {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        Ok(Self {
            client: aws_sdk_s3::Client::from_conf(builder.build()),
            bucket: bucket.to_string(),
        })
    }
}

#[async_trait]
impl FileSystem for S3FileSystem {
    fn protocol(&self) -> &str {
        "s3"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(self
            .client
            .head_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .is_ok())
    }

    async fn exists(&self, _path: &str) -> AppResult<bool> {
        Err(AppError::not_implemented("S3 exists not yet implemented"))
    }

    async fn info(&self, _path: &str) -> AppResult<FsEntry> {
        Err(AppError::not_implemented("S3 info not yet implemented"))
    }

    async fn list(&self, _path: &str) -> AppResult<Vec<FsEntry>> {
        Err(AppError::not_implemented("S3 list not yet implemented"))
    }

    async fn mkdir(&self, _path: &str, _options: &MkdirOptions) -> AppResult<()> {
        Err(AppError::not_implemented("S3 mkdir not yet implemented"))
    }

    async fn rename(&self, _from: &str, _to: &str) -> AppResult<()> {
        Err(AppError::not_implemented("S3 rename not yet implemented"))
    }

    async fn copy(&self, _from: &str, _to: &str, _recursive: bool) -> AppResult<()> {
        Err(AppError::not_implemented("S3 copy not yet implemented"))
    }

    async fn rm(&self, _path: &str, _recursive: bool) -> AppResult<()> {
        Err(AppError::not_implemented("S3 rm not yet implemented"))
    }

    async fn read(&self, _path: &str) -> AppResult<ByteStream> {
        Err(AppError::not_implemented("S3 read not yet implemented"))
    }

    async fn read_bytes(&self, _path: &str) -> AppResult<Bytes> {
        Err(AppError::not_implemented(
            "S3 read_bytes not yet implemented",
        ))
    }

    async fn write_bytes(&self, _path: &str, _data: Bytes) -> AppResult<()> {
        Err(AppError::not_implemented(
            "S3 write_bytes not yet implemented",
        ))
    }

    async fn checksum(&self, _path: &str) -> AppResult<Option<String>> {
        Err(AppError::not_implemented(
            "S3 checksum not yet implemented",
        ))
    }
}
