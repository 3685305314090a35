//! In-memory field value store.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use foldergate_core::error::AppError;
use foldergate_core::result::AppResult;
use foldergate_core::traits::record::FieldValueStore;

#[derive(Debug, Default)]
struct ModelEntry {
    fields: HashSet<String>,
    records: HashMap<Uuid, RecordEntry>,
}

#[derive(Debug, Default)]
struct RecordEntry {
    display_name: String,
    values: HashMap<String, String>,
}

/// In-memory [`FieldValueStore`], used by tests and single-process demos.
///
/// Models and their folder fields are registered up front; operations
/// against anything unregistered fail with a not-found error, which is how
/// the web API rejects unknown models and fields.
#[derive(Debug, Default)]
pub struct MemoryFieldStore {
    models: RwLock<HashMap<String, ModelEntry>>,
}

impl MemoryFieldStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a model and its folder fields.
    pub async fn register_model(&self, model: &str, fields: &[&str]) {
        let mut models = self.models.write().await;
        let entry = models.entry(model.to_string()).or_default();
        for field in fields {
            entry.fields.insert((*field).to_string());
        }
    }

    /// Create a record with a display name, returning its ID.
    pub async fn create_record(&self, model: &str, display_name: &str) -> AppResult<Uuid> {
        let mut models = self.models.write().await;
        let entry = models
            .get_mut(model)
            .ok_or_else(|| AppError::not_found(format!("Unknown model: {model}")))?;
        let id = Uuid::new_v4();
        entry.records.insert(
            id,
            RecordEntry {
                display_name: display_name.to_string(),
                values: HashMap::new(),
            },
        );
        Ok(id)
    }
}

#[async_trait]
impl FieldValueStore for MemoryFieldStore {
    async fn get_value(
        &self,
        model: &str,
        record_id: Uuid,
        field: &str,
    ) -> AppResult<Option<String>> {
        let models = self.models.read().await;
        let entry = models
            .get(model)
            .ok_or_else(|| AppError::not_found(format!("Unknown model: {model}")))?;
        if !entry.fields.contains(field) {
            return Err(AppError::not_found(format!(
                "Unknown field: {model}.{field}"
            )));
        }
        let record = entry
            .records
            .get(&record_id)
            .ok_or_else(|| AppError::not_found(format!("Record not found: {model}/{record_id}")))?;
        Ok(record.values.get(field).cloned())
    }

    async fn set_value(
        &self,
        model: &str,
        record_id: Uuid,
        field: &str,
        value: Option<&str>,
    ) -> AppResult<()> {
        let mut models = self.models.write().await;
        let entry = models
            .get_mut(model)
            .ok_or_else(|| AppError::not_found(format!("Unknown model: {model}")))?;
        if !entry.fields.contains(field) {
            return Err(AppError::not_found(format!(
                "Unknown field: {model}.{field}"
            )));
        }
        let record = entry
            .records
            .get_mut(&record_id)
            .ok_or_else(|| AppError::not_found(format!("Record not found: {model}/{record_id}")))?;
        match value {
            Some(value) => {
                record.values.insert(field.to_string(), value.to_string());
            }
            None => {
                record.values.remove(field);
            }
        }
        Ok(())
    }

    async fn display_name(&self, model: &str, record_id: Uuid) -> AppResult<String> {
        let models = self.models.read().await;
        let entry = models
            .get(model)
            .ok_or_else(|| AppError::not_found(format!("Unknown model: {model}")))?;
        let record = entry
            .records
            .get(&record_id)
            .ok_or_else(|| AppError::not_found(format!("Record not found: {model}/{record_id}")))?;
        Ok(record.display_name.clone())
    }
}
