//! Local filesystem provider.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::StreamExt;
use tokio::fs;
use tokio_util::io::ReaderStream;
use tracing::debug;

use foldergate_core::error::{AppError, ErrorKind};
use foldergate_core::result::AppResult;
use foldergate_core::traits::filesystem::{
    ByteStream, EntryKind, FileSystem, FsEntry, MkdirOptions,
};

/// Local filesystem provider rooted at a configured directory.
#[derive(Debug, Clone)]
pub struct LocalFileSystem {
    /// Root directory for all stored files.
    root: PathBuf,
}

impl LocalFileSystem {
    /// Create a new local filesystem rooted at the given path.
    pub async fn new(root_path: &str) -> AppResult<Self> {
        let root = PathBuf::from(root_path);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create storage root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root })
    }

    /// Resolve a relative path to an absolute path within the root.
    fn resolve(&self, path: &str) -> PathBuf {
        let clean = path.trim_start_matches('/');
        self.root.join(clean)
    }

    /// Ensure the parent directory of a path exists.
    async fn ensure_parent(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create parent directory: {}", parent.display()),
                    e,
                )
            })?;
        }
        Ok(())
    }

    /// Build an [`FsEntry`] from std metadata.
    fn entry_from_metadata(path: &str, meta: &std::fs::Metadata) -> FsEntry {
        let last_modified = meta
            .modified()
            .ok()
            .map(chrono::DateTime::<chrono::Utc>::from);

        FsEntry {
            name: path.to_string(),
            kind: if meta.is_dir() {
                EntryKind::Directory
            } else {
                EntryKind::File
            },
            size_bytes: if meta.is_dir() { 0 } else { meta.len() },
            mime_type: if meta.is_file() {
                mime_from_path(path)
            } else {
                None
            },
            last_modified,
            checksum: None,
        }
    }

    /// Copy a directory tree without recursing on the stack.
    async fn copy_tree(&self, from: &Path, to: &Path) -> AppResult<()> {
        let mut pending = vec![(from.to_path_buf(), to.to_path_buf())];
        while let Some((src, dst)) = pending.pop() {
            fs::create_dir_all(&dst).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create directory: {}", dst.display()),
                    e,
                )
            })?;
            let mut dir = fs::read_dir(&src).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to read directory: {}", src.display()),
                    e,
                )
            })?;
            while let Some(entry) = dir.next_entry().await.map_err(|e| {
                AppError::with_source(ErrorKind::Storage, "Failed to read directory entry", e)
            })? {
                let entry_src = entry.path();
                let entry_dst = dst.join(entry.file_name());
                let meta = entry.metadata().await.map_err(|e| {
                    AppError::with_source(ErrorKind::Storage, "Failed to get entry metadata", e)
                })?;
                if meta.is_dir() {
                    pending.push((entry_src, entry_dst));
                } else {
                    fs::copy(&entry_src, &entry_dst).await.map_err(|e| {
                        AppError::with_source(
                            ErrorKind::Storage,
                            format!("Failed to copy {}", entry_src.display()),
                            e,
                        )
                    })?;
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl FileSystem for LocalFileSystem {
    fn protocol(&self) -> &str {
        "local"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(self.root.exists() && self.root.is_dir())
    }

    async fn exists(&self, path: &str) -> AppResult<bool> {
        Ok(self.resolve(path).exists())
    }

    async fn info(&self, path: &str) -> AppResult<FsEntry> {
        let full_path = self.resolve(path);
        let meta = fs::metadata(&full_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!("Path not found: {path}"))
            } else {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to get metadata: {path}"),
                    e,
                )
            }
        })?;
        Ok(Self::entry_from_metadata(path, &meta))
    }

    async fn list(&self, path: &str) -> AppResult<Vec<FsEntry>> {
        let full_path = self.resolve(path);
        let meta = fs::metadata(&full_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!("Directory not found: {path}"))
            } else {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to list directory: {path}"),
                    e,
                )
            }
        })?;
        if !meta.is_dir() {
            return Err(AppError::storage(format!("Not a directory: {path}")));
        }

        let mut entries = Vec::new();
        let mut dir = fs::read_dir(&full_path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to list directory: {path}"),
                e,
            )
        })?;

        while let Some(entry) = dir.next_entry().await.map_err(|e| {
            AppError::with_source(ErrorKind::Storage, "Failed to read directory entry", e)
        })? {
            let entry_meta = entry.metadata().await.map_err(|e| {
                AppError::with_source(ErrorKind::Storage, "Failed to get entry metadata", e)
            })?;

            let name = entry.file_name().to_string_lossy().to_string();
            let clean = path.trim_matches('/');
            let entry_path = if clean.is_empty() {
                name
            } else {
                format!("{clean}/{name}")
            };

            entries.push(Self::entry_from_metadata(&entry_path, &entry_meta));
        }

        entries.sort_by(|a, b| {
            b.is_directory()
                .cmp(&a.is_directory())
                .then(a.name.cmp(&b.name))
        });

        Ok(entries)
    }

    async fn mkdir(&self, path: &str, options: &MkdirOptions) -> AppResult<()> {
        let full_path = self.resolve(path);
        let result = if options.create_parents {
            fs::create_dir_all(&full_path).await
        } else {
            fs::create_dir(&full_path).await
        };
        result.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create directory: {path}"),
                e,
            )
        })?;
        debug!(path, "Created directory");
        Ok(())
    }

    async fn rename(&self, from: &str, to: &str) -> AppResult<()> {
        let from_path = self.resolve(from);
        let to_path = self.resolve(to);
        self.ensure_parent(&to_path).await?;

        fs::rename(&from_path, &to_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!("Path not found: {from}"))
            } else {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to rename {from} -> {to}"),
                    e,
                )
            }
        })?;
        Ok(())
    }

    async fn copy(&self, from: &str, to: &str, recursive: bool) -> AppResult<()> {
        let from_path = self.resolve(from);
        let to_path = self.resolve(to);
        self.ensure_parent(&to_path).await?;

        let meta = fs::metadata(&from_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!("Path not found: {from}"))
            } else {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to get metadata: {from}"),
                    e,
                )
            }
        })?;

        if meta.is_dir() {
            if !recursive {
                return Err(AppError::storage(format!(
                    "Cannot copy directory without recursive: {from}"
                )));
            }
            self.copy_tree(&from_path, &to_path).await?;
        } else {
            fs::copy(&from_path, &to_path).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to copy {from} -> {to}"),
                    e,
                )
            })?;
        }
        Ok(())
    }

    async fn rm(&self, path: &str, recursive: bool) -> AppResult<()> {
        let full_path = self.resolve(path);
        let meta = match fs::metadata(&full_path).await {
            Ok(m) => m,
            // Already absent counts as removed.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => {
                return Err(AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to get metadata: {path}"),
                    e,
                ));
            }
        };

        let result = if meta.is_dir() {
            if recursive {
                fs::remove_dir_all(&full_path).await
            } else {
                fs::remove_dir(&full_path).await
            }
        } else {
            fs::remove_file(&full_path).await
        };
        result.map_err(|e| {
            AppError::with_source(ErrorKind::Storage, format!("Failed to remove: {path}"), e)
        })?;
        Ok(())
    }

    async fn read(&self, path: &str) -> AppResult<ByteStream> {
        let full_path = self.resolve(path);
        let file = fs::File::open(&full_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!("File not found: {path}"))
            } else {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to open file: {path}"),
                    e,
                )
            }
        })?;

        let stream = ReaderStream::new(file);
        Ok(Box::pin(stream.map(|r| r.map(|b| b.into()))))
    }

    async fn read_bytes(&self, path: &str) -> AppResult<Bytes> {
        let full_path = self.resolve(path);
        let data = fs::read(&full_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!("File not found: {path}"))
            } else {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to read file: {path}"),
                    e,
                )
            }
        })?;
        Ok(Bytes::from(data))
    }

    async fn write_bytes(&self, path: &str, data: Bytes) -> AppResult<()> {
        let full_path = self.resolve(path);
        self.ensure_parent(&full_path).await?;

        fs::write(&full_path, &data).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write file: {path}"),
                e,
            )
        })?;

        debug!(path, bytes = data.len(), "Wrote file");
        Ok(())
    }

    async fn checksum(&self, path: &str) -> AppResult<Option<String>> {
        let data = self.read_bytes(path).await?;
        let mut hasher = crc32fast::Hasher::new();
        hasher.update(&data);
        Ok(Some(format!("{:08x}", hasher.finalize())))
    }
}

/// Guess MIME type from a file path extension.
pub(crate) fn mime_from_path(path: &str) -> Option<String> {
    let ext = path.rsplit('.').next()?.to_lowercase();
    let mime = match ext.as_str() {
        "txt" => "text/plain",
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "js" => "application/javascript",
        "json" => "application/json",
        "xml" => "application/xml",
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "gz" | "gzip" => "application/gzip",
        "tar" => "application/x-tar",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        "mp4" => "video/mp4",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "csv" => "text/csv",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "ppt" => "application/vnd.ms-powerpoint",
        "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        _ => return None,
    };
    Some(mime.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn make_fs() -> (tempfile::TempDir, LocalFileSystem) {
        let dir = tempfile::tempdir().unwrap();
        let fs = LocalFileSystem::new(dir.path().to_str().unwrap())
            .await
            .unwrap();
        (dir, fs)
    }

    #[tokio::test]
    async fn test_write_read_delete() {
        let (_dir, fs) = make_fs().await;

        let data = Bytes::from("hello world");
        fs.write_bytes("test/file.txt", data.clone()).await.unwrap();

        assert!(fs.exists("test/file.txt").await.unwrap());

        let read_back = fs.read_bytes("test/file.txt").await.unwrap();
        assert_eq!(read_back, data);

        fs.rm("test/file.txt", false).await.unwrap();
        assert!(!fs.exists("test/file.txt").await.unwrap());
    }

    #[tokio::test]
    async fn test_list() {
        let (_dir, fs) = make_fs().await;

        fs.write_bytes("listdir/a.txt", Bytes::from("a"))
            .await
            .unwrap();
        fs.write_bytes("listdir/b.txt", Bytes::from("b"))
            .await
            .unwrap();
        fs.mkdir("listdir/subdir", &MkdirOptions::with_parents())
            .await
            .unwrap();

        let entries = fs.list("listdir").await.unwrap();
        assert_eq!(entries.len(), 3);
        // Directories come first
        assert!(entries[0].is_directory());
        assert_eq!(entries[0].name, "listdir/subdir");
        assert_eq!(entries[1].name, "listdir/a.txt");
    }

    #[tokio::test]
    async fn test_copy_rename() {
        let (_dir, fs) = make_fs().await;

        fs.write_bytes("orig.txt", Bytes::from("content"))
            .await
            .unwrap();
        fs.copy("orig.txt", "copy.txt", false).await.unwrap();

        assert!(fs.exists("orig.txt").await.unwrap());
        assert!(fs.exists("copy.txt").await.unwrap());

        fs.rename("copy.txt", "moved.txt").await.unwrap();
        assert!(!fs.exists("copy.txt").await.unwrap());
        assert!(fs.exists("moved.txt").await.unwrap());
    }

    #[tokio::test]
    async fn test_copy_recursive() {
        let (_dir, fs) = make_fs().await;

        fs.write_bytes("tree/a.txt", Bytes::from("a")).await.unwrap();
        fs.write_bytes("tree/sub/b.txt", Bytes::from("b"))
            .await
            .unwrap();

        fs.copy("tree", "tree_copy", true).await.unwrap();

        assert!(fs.exists("tree_copy/a.txt").await.unwrap());
        assert!(fs.exists("tree_copy/sub/b.txt").await.unwrap());
        assert_eq!(
            fs.read_bytes("tree_copy/sub/b.txt").await.unwrap(),
            Bytes::from("b")
        );
    }

    #[tokio::test]
    async fn test_info_root_and_missing() {
        let (_dir, fs) = make_fs().await;

        let root = fs.info("").await.unwrap();
        assert!(root.is_directory());
        assert_eq!(root.name, "");

        let err = fs.info("nope.txt").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_checksum_stable() {
        let (_dir, fs) = make_fs().await;

        fs.write_bytes("sum.txt", Bytes::from("hello")).await.unwrap();
        let first = fs.checksum("sum.txt").await.unwrap();
        let second = fs.checksum("sum.txt").await.unwrap();
        assert!(first.is_some());
        assert_eq!(first, second);
    }

    #[test]
    fn test_mime_detection() {
        assert_eq!(mime_from_path("file.pdf"), Some("application/pdf".into()));
        assert_eq!(mime_from_path("img.PNG"), Some("image/png".into()));
        assert_eq!(mime_from_path("noext"), None);
    }
}
