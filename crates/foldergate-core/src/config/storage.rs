//! Storage backend configuration.

use serde::{Deserialize, Serialize};

/// Top-level storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Maximum upload size in bytes (default 512 MB).
    #[serde(default = "default_max_upload")]
    pub max_upload_size_bytes: u64,
    /// Configured storage backends.
    #[serde(default)]
    pub backends: Vec<BackendConfig>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            max_upload_size_bytes: default_max_upload(),
            backends: Vec::new(),
        }
    }
}

/// Configuration of one storage backend.
///
/// A backend is a named, coded connection to one storage protocol. The
/// `options` bag holds protocol-specific settings (bucket, endpoint,
/// region, credentials, base URL, ...) and is passed through to the
/// provider untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Human-readable backend name.
    pub name: String,
    /// Unique backend code, used in stored values.
    pub code: String,
    /// Storage protocol: "local", "s3", or "webdav".
    pub protocol: String,
    /// Root path within the protocol (directory, bucket prefix, ...).
    #[serde(default)]
    pub root: String,
    /// Protocol-specific option bag.
    #[serde(default)]
    pub options: serde_json::Value,
    /// Use this backend for new folder-field content by default.
    /// At most one backend may carry this flag.
    #[serde(default)]
    pub default_for_folder_content: bool,
    /// Replace invalid characters in created names instead of rejecting.
    #[serde(default = "default_true")]
    pub sanitize_names: bool,
    /// Replacement character used when `sanitize_names` is set. May be
    /// empty, in which case invalid characters are removed.
    #[serde(default = "default_replace_char")]
    pub sanitize_replace_char: String,
}

fn default_max_upload() -> u64 {
    536_870_912 // 512 MB
}

fn default_true() -> bool {
    true
}

fn default_replace_char() -> String {
    "_".to_string()
}
