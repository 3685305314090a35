//! Request DTOs.

use serde::{Deserialize, Serialize};

/// Create a subfolder `name` under `path`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFolderRequest {
    /// Parent path, root-relative. Empty for the folder root.
    #[serde(default)]
    pub path: String,
    /// Name of the new folder.
    pub name: String,
}

/// Rename `name` to `new_name` within `path`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameRequest {
    /// Parent path of the entry.
    #[serde(default)]
    pub path: String,
    /// Current entry name.
    pub name: String,
    /// New entry name.
    pub new_name: String,
}

/// Move or copy `entry` from `origin_path` into `path`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferRequest {
    /// Current parent path of the entry.
    #[serde(default)]
    pub origin_path: String,
    /// Destination parent path.
    #[serde(default)]
    pub path: String,
    /// Name of the entry being moved or copied.
    pub entry: String,
}

/// Upload a base64-encoded file `name` under `path`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadRequest {
    /// Parent path for the new file.
    #[serde(default)]
    pub path: String,
    /// File name.
    pub name: String,
    /// Base64-encoded content.
    pub data: String,
}

/// Overwrite the content of the file at `path`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateContentRequest {
    /// Path of the file.
    pub path: String,
    /// Base64-encoded content.
    pub data: String,
}

/// Delete entry `name` under `path`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteRequest {
    /// Parent path of the entry.
    #[serde(default)]
    pub path: String,
    /// Name of the entry to delete.
    pub name: String,
    /// Remove directories recursively.
    #[serde(default = "default_recursive")]
    pub recursive: bool,
}

fn default_recursive() -> bool {
    true
}

/// Query parameters for listing children.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChildrenQuery {
    /// Path to list, root-relative. Empty for the folder root.
    #[serde(default)]
    pub path: String,
}

/// Query parameters for file streaming.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileQuery {
    /// Path of the file to stream.
    pub path: String,
    /// Serve as an attachment (download) instead of inline.
    #[serde(default)]
    pub download: Option<String>,
}

impl FileQuery {
    /// Whether the download flag is set (`1`, `true`, `yes`).
    pub fn as_attachment(&self) -> bool {
        match self.download.as_deref() {
            Some(value) => matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes"),
            None => false,
        }
    }
}
