//! The folder-field value type.

use serde::{Deserialize, Serialize};

/// The value of a folder field.
///
/// Wraps the persisted stored value (`{backend_code}://{reference}`)
/// together with its parsed parts. An unset value (absent or empty stored
/// string) is a first-class state: it compares equal to `FolderValue::unset()`
/// and resolves to no sandbox.
///
/// The reference is by default the full path of the folder within the
/// backend's filesystem. A [`ValueAdapter`](crate::adapter::ValueAdapter)
/// may store an immutable identifier instead when the backend does not
/// support stable paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderValue {
    stored: Option<String>,
    reference: Option<String>,
    backend_code: Option<String>,
}

impl FolderValue {
    /// An unset value.
    pub fn unset() -> Self {
        Self {
            stored: None,
            reference: None,
            backend_code: None,
        }
    }

    /// Construct a value from its stored form and parsed parts.
    ///
    /// Used by value adapters; most callers obtain values through
    /// [`ValueAdapter::decode`](crate::adapter::ValueAdapter::decode).
    pub fn from_parts(
        stored: String,
        reference: Option<String>,
        backend_code: Option<String>,
    ) -> Self {
        Self {
            stored: Some(stored),
            reference,
            backend_code,
        }
    }

    /// The raw value persisted in the store, `None` when unset.
    pub fn stored_value(&self) -> Option<&str> {
        self.stored.as_deref()
    }

    /// The reference of the folder within the backend's filesystem.
    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    /// The code of the backend holding the folder.
    pub fn backend_code(&self) -> Option<&str> {
        self.backend_code.as_deref()
    }

    /// Whether the value is set.
    pub fn is_set(&self) -> bool {
        self.stored.is_some()
    }

    /// Build the external read projection of this value.
    pub fn info(&self, protocol: &str) -> FolderValueInfo {
        FolderValueInfo {
            reference: self.reference.clone().unwrap_or_default(),
            backend_code: self.backend_code.clone().unwrap_or_default(),
            protocol: protocol.to_string(),
        }
    }
}

/// Read projection of a folder value.
///
/// This is what field reads expose externally — never the raw stored
/// string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderValueInfo {
    /// Folder reference within the backend.
    pub reference: String,
    /// Backend code.
    pub backend_code: String,
    /// Root protocol of the backend's filesystem.
    pub protocol: String,
}
