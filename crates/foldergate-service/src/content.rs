//! Folder content service — the proxy behind the folder-field web API.

use std::collections::HashMap;
use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use bytes::Bytes;
use uuid::Uuid;

use foldergate_core::error::{AppError, ErrorKind};
use foldergate_core::result::AppResult;
use foldergate_core::traits::access::{AccessMode, AccessPolicy};
use foldergate_core::traits::filesystem::{FileSystem, FsEntry, MkdirOptions};
use foldergate_core::traits::record::{FieldValueStore, RecordRef};
use foldergate_storage::registry::BackendRegistry;
use foldergate_storage::sandbox::RootedFileSystem;

use crate::adapter::ValueAdapter;
use crate::context::RequestContext;
use crate::create::{FieldSpec, FolderCreator};
use crate::stream::ContentStream;
use crate::value::{FolderValue, FolderValueInfo};

/// Stateless proxy between the web API and sandboxed folder content.
///
/// Every operation checks access on the record+field pair (read for
/// queries, write for mutations), resolves the sandboxed view for the
/// stored value, and delegates to it. Listing failures are translated
/// into a user-facing error, since an unresolvable reference usually
/// means the folder was moved or deleted on the external storage; every
/// other delegate failure propagates unmodified.
#[derive(Debug)]
pub struct FolderContentService {
    registry: Arc<BackendRegistry>,
    store: Arc<dyn FieldValueStore>,
    adapter: Arc<dyn ValueAdapter>,
    access: Arc<dyn AccessPolicy>,
    creator: FolderCreator,
    specs: HashMap<String, FieldSpec>,
}

impl FolderContentService {
    /// Creates a new folder content service.
    pub fn new(
        registry: Arc<BackendRegistry>,
        store: Arc<dyn FieldValueStore>,
        adapter: Arc<dyn ValueAdapter>,
        access: Arc<dyn AccessPolicy>,
        creator: FolderCreator,
    ) -> Self {
        Self {
            registry,
            store,
            adapter,
            access,
            creator,
            specs: HashMap::new(),
        }
    }

    /// Register a non-default field spec (custom creation strategies).
    pub fn register_field_spec(&mut self, spec: FieldSpec) {
        self.specs.insert(format!("{}.{}", spec.model, spec.field), spec);
    }

    fn spec_for(&self, model: &str, field: &str) -> FieldSpec {
        self.specs
            .get(&format!("{model}.{field}"))
            .cloned()
            .unwrap_or_else(|| FieldSpec::new(model, field))
    }

    /// Access pre-check: the record+field must exist (NotFound otherwise)
    /// and the acting user must hold the required access.
    async fn check(
        &self,
        ctx: &RequestContext,
        model: &str,
        record_id: Uuid,
        field: &str,
        mode: AccessMode,
    ) -> AppResult<()> {
        self.store.get_value(model, record_id, field).await?;
        self.access
            .check_field_access(ctx.user_id, ctx.role, model, record_id, field, mode)
            .await
    }

    /// Load and decode the stored value of a record+field pair.
    async fn load_value(&self, model: &str, record_id: Uuid, field: &str) -> AppResult<FolderValue> {
        let stored = self.store.get_value(model, record_id, field).await?;
        Ok(self.adapter.decode(stored.as_deref()))
    }

    /// Resolve the sandboxed view for a record+field pair.
    async fn sandbox(
        &self,
        model: &str,
        record_id: Uuid,
        field: &str,
    ) -> AppResult<RootedFileSystem> {
        let value = self.load_value(model, record_id, field).await?;
        self.adapter
            .resolve(&value, &self.registry)
            .await?
            .ok_or_else(|| {
                AppError::validation(format!("The field {model}.{field} has no folder content"))
            })
    }

    /// Read projection of the field value: `{reference, backend_code,
    /// protocol}`, or `None` when unset.
    pub async fn value_info(
        &self,
        ctx: &RequestContext,
        model: &str,
        record_id: Uuid,
        field: &str,
    ) -> AppResult<Option<FolderValueInfo>> {
        self.check(ctx, model, record_id, field, AccessMode::Read)
            .await?;
        let value = self.load_value(model, record_id, field).await?;
        if !value.is_set() {
            return Ok(None);
        }
        let backend = self
            .registry
            .get(value.backend_code().unwrap_or_default())
            .await?;
        Ok(Some(value.info(backend.protocol())))
    }

    /// List the children of a path within the folder.
    pub async fn get_children(
        &self,
        ctx: &RequestContext,
        model: &str,
        record_id: Uuid,
        field: &str,
        path: &str,
    ) -> AppResult<Vec<FsEntry>> {
        self.check(ctx, model, record_id, field, AccessMode::Read)
            .await?;
        let fs = self.sandbox(model, record_id, field).await?;
        fs.list(path).await.map_err(|e| match e.kind {
            ErrorKind::AccessDenied => e,
            _ => AppError::user_facing(format!(
                "An error occurred while listing files: '{e}'\n\
                 This might happen if the folder was moved, renamed or deleted \
                 on the external storage.\n\
                 If this is expected you might want to unlink this folder."
            )),
        })
    }

    /// Stat the root of the folder. Its name is reported as empty, never
    /// the real backend path.
    pub async fn get_root(
        &self,
        ctx: &RequestContext,
        model: &str,
        record_id: Uuid,
        field: &str,
    ) -> AppResult<FsEntry> {
        self.check(ctx, model, record_id, field, AccessMode::Read)
            .await?;
        let fs = self.sandbox(model, record_id, field).await?;
        fs.info("").await
    }

    /// Rename (move) an entry. A no-op when source and destination match.
    pub async fn rename(
        &self,
        ctx: &RequestContext,
        model: &str,
        record_id: Uuid,
        field: &str,
        path: &str,
        new_path: &str,
    ) -> AppResult<()> {
        self.check(ctx, model, record_id, field, AccessMode::Write)
            .await?;
        if path == new_path {
            return Ok(());
        }
        let fs = self.sandbox(model, record_id, field).await?;
        fs.rename(path, new_path).await
    }

    /// Create a subfolder (with missing parents) at the given path.
    pub async fn create_folder(
        &self,
        ctx: &RequestContext,
        model: &str,
        record_id: Uuid,
        field: &str,
        path: &str,
    ) -> AppResult<()> {
        self.check(ctx, model, record_id, field, AccessMode::Write)
            .await?;
        let fs = self.sandbox(model, record_id, field).await?;
        fs.mkdir(path, &MkdirOptions::with_parents()).await
    }

    /// Upload a base64-encoded file under the given path.
    pub async fn upload_file(
        &self,
        ctx: &RequestContext,
        model: &str,
        record_id: Uuid,
        field: &str,
        path: &str,
        file_name: &str,
        data_b64: &str,
    ) -> AppResult<()> {
        self.check(ctx, model, record_id, field, AccessMode::Write)
            .await?;
        let data = decode_content(data_b64)?;
        let fs = self.sandbox(model, record_id, field).await?;
        let full_path = if path.is_empty() {
            file_name.to_string()
        } else {
            format!("{path}{}{file_name}", fs.sep())
        };
        fs.write_bytes(&full_path, data).await
    }

    /// Overwrite the content of an existing file with base64-encoded data.
    pub async fn update_content(
        &self,
        ctx: &RequestContext,
        model: &str,
        record_id: Uuid,
        field: &str,
        path: &str,
        data_b64: &str,
    ) -> AppResult<()> {
        self.check(ctx, model, record_id, field, AccessMode::Write)
            .await?;
        let data = decode_content(data_b64)?;
        let fs = self.sandbox(model, record_id, field).await?;
        fs.write_bytes(path, data).await
    }

    /// Copy an entry, recursively for directories.
    pub async fn copy_item(
        &self,
        ctx: &RequestContext,
        model: &str,
        record_id: Uuid,
        field: &str,
        path: &str,
        new_path: &str,
        recursive: bool,
    ) -> AppResult<()> {
        self.check(ctx, model, record_id, field, AccessMode::Write)
            .await?;
        let fs = self.sandbox(model, record_id, field).await?;
        fs.copy(path, new_path, recursive).await
    }

    /// Delete an entry, recursively for directories.
    pub async fn delete(
        &self,
        ctx: &RequestContext,
        model: &str,
        record_id: Uuid,
        field: &str,
        path: &str,
        recursive: bool,
    ) -> AppResult<()> {
        self.check(ctx, model, record_id, field, AccessMode::Write)
            .await?;
        let fs = self.sandbox(model, record_id, field).await?;
        fs.rm(path, recursive).await
    }

    /// Open a file for streaming (preview or download).
    pub async fn stream(
        &self,
        ctx: &RequestContext,
        model: &str,
        record_id: Uuid,
        field: &str,
        path: &str,
    ) -> AppResult<ContentStream> {
        self.check(ctx, model, record_id, field, AccessMode::Read)
            .await?;
        let fs = self.sandbox(model, record_id, field).await?;
        ContentStream::from_sandbox(&fs, path).await
    }

    /// Initialize the field value by creating its folder.
    ///
    /// Fails with a conflict when the value is already set.
    pub async fn initialize(
        &self,
        ctx: &RequestContext,
        model: &str,
        record_id: Uuid,
        field: &str,
    ) -> AppResult<FolderValue> {
        self.check(ctx, model, record_id, field, AccessMode::Write)
            .await?;
        let current = self.load_value(model, record_id, field).await?;
        if current.is_set() {
            return Err(AppError::conflict(format!(
                "Value already set for {model}.{field}"
            )));
        }

        let spec = self.spec_for(model, field);
        let records = [RecordRef::new(model, record_id)];
        let mut values = self.creator.create_values(&records, &spec).await?;
        Ok(values.remove(0))
    }

    /// Clear the field value without touching the folder content.
    pub async fn remove_value(
        &self,
        ctx: &RequestContext,
        model: &str,
        record_id: Uuid,
        field: &str,
    ) -> AppResult<()> {
        self.check(ctx, model, record_id, field, AccessMode::Write)
            .await?;
        self.store.set_value(model, record_id, field, None).await
    }

    /// Delete the folder content and clear the field value.
    pub async fn delete_folder(
        &self,
        ctx: &RequestContext,
        model: &str,
        record_id: Uuid,
        field: &str,
    ) -> AppResult<()> {
        self.check(ctx, model, record_id, field, AccessMode::Write)
            .await?;
        let fs = self.sandbox(model, record_id, field).await?;
        fs.rm("", true).await?;
        self.store.set_value(model, record_id, field, None).await
    }
}

/// Decode a base64 payload into bytes.
fn decode_content(data_b64: &str) -> AppResult<Bytes> {
    BASE64
        .decode(data_b64)
        .map(Bytes::from)
        .map_err(|e| AppError::validation(format!("Invalid base64 content: {e}")))
}
