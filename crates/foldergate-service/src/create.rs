//! Folder creation for folder fields.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use foldergate_core::config::folder::FolderConfig;
use foldergate_core::error::AppError;
use foldergate_core::result::AppResult;
use foldergate_core::traits::filesystem::MkdirOptions;
use foldergate_core::traits::record::{FieldValueStore, RecordRef};
use foldergate_storage::registry::BackendRegistry;

use crate::adapter::ValueAdapter;
use crate::value::FolderValue;

/// Computes the folder name for a record.
pub type NameFn = Arc<dyn Fn(&RecordRef) -> String + Send + Sync>;
/// Computes the parent path segments for a record.
pub type ParentFn = Arc<dyn Fn(&RecordRef) -> Vec<String> + Send + Sync>;
/// Computes backend-specific creation options for a record.
pub type OptionsFn = Arc<dyn Fn(&RecordRef) -> serde_json::Value + Send + Sync>;

/// How the folder name is chosen for each record.
#[derive(Clone, Default)]
pub enum NameStrategy {
    /// Use the record's display name.
    #[default]
    DisplayName,
    /// Caller-supplied function.
    Custom(NameFn),
}

impl fmt::Debug for NameStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DisplayName => write!(f, "DisplayName"),
            Self::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

/// Where the folder is created for each record.
#[derive(Clone, Default)]
pub enum ParentStrategy {
    /// Directly under the backend root.
    #[default]
    Root,
    /// Caller-supplied function returning parent path segments.
    Custom(ParentFn),
}

impl fmt::Debug for ParentStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root => write!(f, "Root"),
            Self::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

/// Backend-specific creation options for each record.
#[derive(Clone, Default)]
pub enum CreateOptionsStrategy {
    /// No extra options.
    #[default]
    None,
    /// Caller-supplied function.
    Custom(OptionsFn),
}

impl fmt::Debug for CreateOptionsStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

/// Definition of one folder field: the model+field it lives on and the
/// strategies used when its folders are created.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    /// Model the field belongs to.
    pub model: String,
    /// Field name.
    pub field: String,
    /// Folder name strategy.
    pub name_strategy: NameStrategy,
    /// Parent path strategy.
    pub parent_strategy: ParentStrategy,
    /// Creation options strategy.
    pub options_strategy: CreateOptionsStrategy,
}

impl FieldSpec {
    /// A field spec with the default strategies.
    pub fn new(model: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            field: field.into(),
            name_strategy: NameStrategy::default(),
            parent_strategy: ParentStrategy::default(),
            options_strategy: CreateOptionsStrategy::default(),
        }
    }

    /// Override the name strategy.
    pub fn with_name_strategy(mut self, strategy: NameStrategy) -> Self {
        self.name_strategy = strategy;
        self
    }

    /// Override the parent strategy.
    pub fn with_parent_strategy(mut self, strategy: ParentStrategy) -> Self {
        self.parent_strategy = strategy;
        self
    }

    /// Override the creation options strategy.
    pub fn with_options_strategy(mut self, strategy: CreateOptionsStrategy) -> Self {
        self.options_strategy = strategy;
        self
    }
}

/// A folder created during a batch, tracked for rollback compensation.
#[derive(Debug, Clone)]
struct CreatedFolder {
    path: String,
    backend_code: String,
    record: RecordRef,
    field: String,
}

/// Creates folders for folder fields.
///
/// Creation is batch-oriented: each record's name, parents, and options
/// are computed independently, sanitized per the backend configuration,
/// and the directory is created before the encoded value is persisted.
///
/// When any step of the batch fails, the folders already created are
/// compensated: their values are cleared and, unless disabled by
/// configuration, a deferred best-effort task removes the directories
/// after a short delay. Compensation failures are logged, never raised.
#[derive(Debug, Clone)]
pub struct FolderCreator {
    registry: Arc<BackendRegistry>,
    store: Arc<dyn FieldValueStore>,
    adapter: Arc<dyn ValueAdapter>,
    config: FolderConfig,
}

impl FolderCreator {
    /// Creates a new folder creator.
    pub fn new(
        registry: Arc<BackendRegistry>,
        store: Arc<dyn FieldValueStore>,
        adapter: Arc<dyn ValueAdapter>,
        config: FolderConfig,
    ) -> Self {
        Self {
            registry,
            store,
            adapter,
            config,
        }
    }

    /// Create folders for the given records and persist the encoded
    /// values, returning them in record order.
    pub async fn create_values(
        &self,
        records: &[RecordRef],
        spec: &FieldSpec,
    ) -> AppResult<Vec<FolderValue>> {
        let mut created = Vec::new();
        match self.create_inner(records, spec, &mut created).await {
            Ok(values) => Ok(values),
            Err(err) => {
                self.compensate(created).await;
                Err(err)
            }
        }
    }

    async fn create_inner(
        &self,
        records: &[RecordRef],
        spec: &FieldSpec,
        created: &mut Vec<CreatedFolder>,
    ) -> AppResult<Vec<FolderValue>> {
        let code = self.registry.default_code_for_folder_content().await?;
        let backend = self.registry.get(&code).await?;
        let fs = backend.filesystem();
        let sep = fs.sep().to_string();

        let mut values = Vec::with_capacity(records.len());
        for record in records {
            let name = match &spec.name_strategy {
                NameStrategy::DisplayName => {
                    self.store.display_name(&record.model, record.id).await?
                }
                NameStrategy::Custom(f) => f(record),
            };
            let parents = match &spec.parent_strategy {
                ParentStrategy::Root => Vec::new(),
                ParentStrategy::Custom(f) => f(record),
            };
            let options = match &spec.options_strategy {
                CreateOptionsStrategy::None => serde_json::Value::Null,
                CreateOptionsStrategy::Custom(f) => f(record),
            };

            let mut segments = parents;
            segments.push(name);
            let segments = backend.prepare_segments(&segments)?;
            if segments.iter().any(|s| s.is_empty()) {
                return Err(AppError::validation(format!(
                    "Empty folder name for {}/{}",
                    record.model, record.id
                )));
            }

            let path = segments.join(&sep);
            fs.mkdir(
                &path,
                &MkdirOptions {
                    create_parents: true,
                    backend_options: options,
                },
            )
            .await?;
            created.push(CreatedFolder {
                path: path.clone(),
                backend_code: code.clone(),
                record: record.clone(),
                field: spec.field.clone(),
            });

            let stored = self.adapter.encode(&path, &code, fs.as_ref()).await?;
            self.store
                .set_value(&record.model, record.id, &spec.field, Some(&stored))
                .await?;
            tracing::debug!(model = %record.model, id = %record.id, path, "Created folder");
            values.push(self.adapter.decode(Some(&stored)));
        }
        Ok(values)
    }

    /// Undo the visible effects of a failed batch.
    async fn compensate(&self, created: Vec<CreatedFolder>) {
        for folder in created {
            if let Err(e) = self
                .store
                .set_value(&folder.record.model, folder.record.id, &folder.field, None)
                .await
            {
                tracing::warn!(
                    model = %folder.record.model,
                    id = %folder.record.id,
                    error = %e,
                    "Could not clear folder value during rollback"
                );
            }

            if self.config.disable_rollback_cleanup {
                continue;
            }
            let registry = Arc::clone(&self.registry);
            let delay = Duration::from_millis(self.config.rollback_cleanup_delay_ms);
            tokio::spawn(async move {
                // Wait for the just-created object to become visible on the
                // remote store before removing it.
                tokio::time::sleep(delay).await;
                match registry.get_fs(&folder.backend_code).await {
                    Ok(fs) => {
                        if let Err(e) = fs.rm(&folder.path, true).await {
                            tracing::error!(
                                path = %folder.path,
                                error = %e,
                                "Error cleaning up folder after rollback"
                            );
                        }
                    }
                    Err(e) => {
                        tracing::error!(
                            backend = %folder.backend_code,
                            error = %e,
                            "Error cleaning up folder after rollback"
                        );
                    }
                }
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use foldergate_core::config::storage::BackendConfig;
    use foldergate_core::traits::filesystem::FileSystem;

    use crate::adapter::DefaultValueAdapter;
    use crate::store::memory::MemoryFieldStore;

    struct Harness {
        _dir: tempfile::TempDir,
        registry: Arc<BackendRegistry>,
        store: Arc<MemoryFieldStore>,
        creator: FolderCreator,
    }

    async fn harness(sanitize: bool, disable_cleanup: bool) -> Harness {
        let dir = tempfile::tempdir().unwrap();
        let registry = Arc::new(BackendRegistry::new());
        registry
            .register(BackendConfig {
                name: "Temp".to_string(),
                code: "tmp_dir".to_string(),
                protocol: "local".to_string(),
                root: dir.path().to_str().unwrap().to_string(),
                options: serde_json::Value::Null,
                default_for_folder_content: true,
                sanitize_names: sanitize,
                sanitize_replace_char: "_".to_string(),
            })
            .await
            .unwrap();

        let store = Arc::new(MemoryFieldStore::new());
        store.register_model("project", &["documents"]).await;

        let store_dyn: Arc<dyn FieldValueStore> = store.clone();
        let creator = FolderCreator::new(
            Arc::clone(&registry),
            store_dyn,
            Arc::new(DefaultValueAdapter),
            FolderConfig {
                disable_rollback_cleanup: disable_cleanup,
                rollback_cleanup_delay_ms: 10,
            },
        );

        Harness {
            _dir: dir,
            registry,
            store,
            creator,
        }
    }

    #[tokio::test]
    async fn test_create_with_default_strategies() {
        let h = harness(true, true).await;
        let id = h.store.create_record("project", "Project Alpha").await.unwrap();
        let records = [RecordRef::new("project", id)];

        let values = h
            .creator
            .create_values(&records, &FieldSpec::new("project", "documents"))
            .await
            .unwrap();

        assert_eq!(values.len(), 1);
        assert_eq!(values[0].reference(), Some("Project Alpha"));
        assert_eq!(values[0].backend_code(), Some("tmp_dir"));

        let stored = h
            .store
            .get_value("project", id, "documents")
            .await
            .unwrap();
        assert_eq!(stored.as_deref(), Some("tmp_dir://Project Alpha"));

        let fs = h.registry.get_fs("tmp_dir").await.unwrap();
        assert!(fs.exists("Project Alpha").await.unwrap());
    }

    #[tokio::test]
    async fn test_create_sanitizes_names() {
        let h = harness(true, true).await;
        let id = h.store.create_record("project", "bad:name?").await.unwrap();
        let records = [RecordRef::new("project", id)];

        let values = h
            .creator
            .create_values(&records, &FieldSpec::new("project", "documents"))
            .await
            .unwrap();
        assert_eq!(values[0].reference(), Some("bad_name_"));
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_name_without_sanitization() {
        let h = harness(false, true).await;
        let id = h.store.create_record("project", "bad:name?").await.unwrap();
        let records = [RecordRef::new("project", id)];

        let err = h
            .creator
            .create_values(&records, &FieldSpec::new("project", "documents"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, foldergate_core::error::ErrorKind::Validation);

        let fs = h.registry.get_fs("tmp_dir").await.unwrap();
        let entries = fs.list("").await.unwrap();
        assert!(entries.is_empty(), "nothing may be created on validation failure");
    }

    #[tokio::test]
    async fn test_create_with_custom_strategies() {
        let h = harness(true, true).await;
        let id = h.store.create_record("project", "Ignored").await.unwrap();
        let records = [RecordRef::new("project", id)];

        let spec = FieldSpec::new("project", "documents")
            .with_name_strategy(NameStrategy::Custom(Arc::new(|r: &RecordRef| {
                format!("rec-{}", r.id)
            })))
            .with_parent_strategy(ParentStrategy::Custom(Arc::new(|_| {
                vec!["archive".to_string(), "2024".to_string()]
            })));

        let values = h.creator.create_values(&records, &spec).await.unwrap();
        let reference = values[0].reference().unwrap().to_string();
        assert!(reference.starts_with("archive/2024/rec-"));

        let fs = h.registry.get_fs("tmp_dir").await.unwrap();
        assert!(fs.exists(&reference).await.unwrap());
    }

    #[tokio::test]
    async fn test_batch_is_order_insensitive() {
        let h = harness(true, true).await;
        let id_a = h.store.create_record("project", "Alpha").await.unwrap();
        let id_b = h.store.create_record("project", "Beta").await.unwrap();

        let records = [
            RecordRef::new("project", id_b),
            RecordRef::new("project", id_a),
        ];
        let values = h
            .creator
            .create_values(&records, &FieldSpec::new("project", "documents"))
            .await
            .unwrap();

        assert_eq!(values[0].reference(), Some("Beta"));
        assert_eq!(values[1].reference(), Some("Alpha"));
    }

    #[tokio::test]
    async fn test_rollback_removes_created_directory() {
        let h = harness(true, false).await;
        let id = h.store.create_record("project", "Doomed").await.unwrap();
        let records = [RecordRef::new("project", id)];

        // The field is not registered, so persisting the value fails after
        // the directory was created.
        let err = h
            .creator
            .create_values(&records, &FieldSpec::new("project", "ghost_field"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, foldergate_core::error::ErrorKind::NotFound);

        let fs = h.registry.get_fs("tmp_dir").await.unwrap();
        assert!(fs.exists("Doomed").await.unwrap());

        // The deferred cleanup removes it after the visibility delay.
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!fs.exists("Doomed").await.unwrap());
    }
}
