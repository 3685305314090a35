//! Persistence seam for folder-field values attached to records.

use async_trait::async_trait;
use uuid::Uuid;

use crate::result::AppResult;

/// Reference to an application record owning a folder field.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RecordRef {
    /// Model (record type) name.
    pub model: String,
    /// Record identifier.
    pub id: Uuid,
}

impl RecordRef {
    /// Create a new record reference.
    pub fn new(model: impl Into<String>, id: Uuid) -> Self {
        Self {
            model: model.into(),
            id,
        }
    }
}

/// Storage of folder-field stored values.
///
/// A stored value is owned by exactly one record+field pair. The store is
/// also the authority on which models and fields exist: operations against
/// an unknown model or field fail with a NotFound-class error so that the
/// web API can reject them before any filesystem access.
#[async_trait]
pub trait FieldValueStore: Send + Sync + std::fmt::Debug + 'static {
    /// Get the stored value for a record+field pair, `None` when unset.
    async fn get_value(
        &self,
        model: &str,
        record_id: Uuid,
        field: &str,
    ) -> AppResult<Option<String>>;

    /// Set (or clear, with `None`) the stored value for a record+field pair.
    async fn set_value(
        &self,
        model: &str,
        record_id: Uuid,
        field: &str,
        value: Option<&str>,
    ) -> AppResult<()>;

    /// Display name of a record, used as the default folder name.
    async fn display_name(&self, model: &str, record_id: Uuid) -> AppResult<String>;
}
