//! Access-control seam for folder-field operations.

use async_trait::async_trait;
use uuid::Uuid;

use crate::result::AppResult;

/// Role of an authenticated user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Read-only access.
    Viewer,
    /// Read and write access.
    Editor,
    /// Full access, including backend administration.
    Admin,
}

/// Kind of access being requested on a record+field pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    /// Query operations (list, stat, stream).
    Read,
    /// Mutating operations (rename, mkdir, upload, delete, ...).
    Write,
}

/// Pre-check performed before every folder-field operation.
///
/// Implementations decide whether the acting user may read or write the
/// given record+field. Unknown models or fields are reported as NotFound by
/// the [`FieldValueStore`](crate::traits::record::FieldValueStore) before
/// this check runs.
#[async_trait]
pub trait AccessPolicy: Send + Sync + std::fmt::Debug + 'static {
    /// Check access, returning an access-denied error when refused.
    async fn check_field_access(
        &self,
        user_id: Uuid,
        role: UserRole,
        model: &str,
        record_id: Uuid,
        field: &str,
        mode: AccessMode,
    ) -> AppResult<()>;
}
