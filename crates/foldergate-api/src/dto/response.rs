//! Response DTOs.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use foldergate_core::traits::filesystem::{EntryKind, FsEntry};

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message.
    pub message: String,
}

/// A folder entry in a listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryResponse {
    /// Entry name relative to the listed path.
    pub name: String,
    /// Full path of the entry, relative to the folder root.
    pub path: String,
    /// Entry kind.
    #[serde(rename = "type")]
    pub kind: EntryKind,
    /// Size in bytes.
    pub size_bytes: u64,
    /// MIME type (if known).
    pub mime_type: Option<String>,
    /// Last modified timestamp.
    pub last_modified: Option<DateTime<Utc>>,
}

impl EntryResponse {
    /// Build a response entry, trimming the listed path prefix from the
    /// name the way clients expect.
    pub fn from_entry(entry: FsEntry, listed_path: &str) -> Self {
        let name = if listed_path.is_empty() {
            entry.name.clone()
        } else {
            entry
                .name
                .strip_prefix(&format!("{listed_path}/"))
                .unwrap_or(&entry.name)
                .to_string()
        };
        Self {
            name,
            path: entry.name,
            kind: entry.kind,
            size_bytes: entry.size_bytes,
            mime_type: entry.mime_type,
            last_modified: entry.last_modified,
        }
    }
}

/// A configured storage backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendResponse {
    /// Backend name.
    pub name: String,
    /// Backend code.
    pub code: String,
    /// Storage protocol.
    pub protocol: String,
    /// Whether the backend is the default for folder content.
    pub default_for_folder_content: bool,
    /// Whether created names are sanitized.
    pub sanitize_names: bool,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status.
    pub status: String,
    /// Version.
    pub version: String,
}

/// Detailed health response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedHealthResponse {
    /// Overall status.
    pub status: String,
    /// Per-backend health.
    pub backends: HashMap<String, bool>,
}
