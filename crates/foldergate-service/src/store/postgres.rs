//! PostgreSQL field value store.

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use foldergate_core::config::store::FieldStoreConfig;
use foldergate_core::error::{AppError, ErrorKind};
use foldergate_core::result::AppResult;
use foldergate_core::traits::record::FieldValueStore;

/// PostgreSQL-backed [`FieldValueStore`].
///
/// The schema is two tables: the records owning folder fields (with their
/// display names) and the field registry. Stored values live on a third
/// table keyed by (model, record, field).
#[derive(Debug, Clone)]
pub struct PostgresFieldStore {
    pool: PgPool,
}

impl PostgresFieldStore {
    /// Create a store over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect using the store configuration.
    pub async fn connect(config: &FieldStoreConfig) -> AppResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.url)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to connect to PostgreSQL", e)
            })?;
        Ok(Self { pool })
    }

    /// Create the schema if it does not exist.
    pub async fn ensure_schema(&self) -> AppResult<()> {
        for statement in [
            "CREATE TABLE IF NOT EXISTS folder_fields ( \
                 model TEXT NOT NULL, \
                 field_name TEXT NOT NULL, \
                 PRIMARY KEY (model, field_name) \
             )",
            "CREATE TABLE IF NOT EXISTS folder_records ( \
                 model TEXT NOT NULL, \
                 id UUID NOT NULL, \
                 display_name TEXT NOT NULL, \
                 PRIMARY KEY (model, id) \
             )",
            "CREATE TABLE IF NOT EXISTS folder_field_values ( \
                 model TEXT NOT NULL, \
                 record_id UUID NOT NULL, \
                 field_name TEXT NOT NULL, \
                 stored_value TEXT NOT NULL, \
                 PRIMARY KEY (model, record_id, field_name) \
             )",
        ] {
            sqlx::query(statement).execute(&self.pool).await.map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to create schema", e)
            })?;
        }
        Ok(())
    }

    /// Register a model field.
    pub async fn register_field(&self, model: &str, field: &str) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO folder_fields (model, field_name) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(model)
        .bind(field)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to register field", e))?;
        Ok(())
    }

    /// Create a record with a display name, returning its ID.
    pub async fn create_record(&self, model: &str, display_name: &str) -> AppResult<Uuid> {
        let id = Uuid::new_v4();
        sqlx::query("INSERT INTO folder_records (model, id, display_name) VALUES ($1, $2, $3)")
            .bind(model)
            .bind(id)
            .bind(display_name)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to create record", e)
            })?;
        Ok(id)
    }

    async fn check_field(&self, model: &str, field: &str) -> AppResult<()> {
        let exists: Option<i32> = sqlx::query_scalar(
            "SELECT 1 FROM folder_fields WHERE model = $1 AND field_name = $2",
        )
        .bind(model)
        .bind(field)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to check field", e))?;
        if exists.is_none() {
            return Err(AppError::not_found(format!(
                "Unknown field: {model}.{field}"
            )));
        }
        Ok(())
    }

    async fn check_record(&self, model: &str, record_id: Uuid) -> AppResult<()> {
        let exists: Option<i32> =
            sqlx::query_scalar("SELECT 1 FROM folder_records WHERE model = $1 AND id = $2")
                .bind(model)
                .bind(record_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to check record", e)
                })?;
        if exists.is_none() {
            return Err(AppError::not_found(format!(
                "Record not found: {model}/{record_id}"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl FieldValueStore for PostgresFieldStore {
    async fn get_value(
        &self,
        model: &str,
        record_id: Uuid,
        field: &str,
    ) -> AppResult<Option<String>> {
        self.check_field(model, field).await?;
        self.check_record(model, record_id).await?;

        sqlx::query_scalar(
            "SELECT stored_value FROM folder_field_values \
             WHERE model = $1 AND record_id = $2 AND field_name = $3",
        )
        .bind(model)
        .bind(record_id)
        .bind(field)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to read field value", e))
    }

    async fn set_value(
        &self,
        model: &str,
        record_id: Uuid,
        field: &str,
        value: Option<&str>,
    ) -> AppResult<()> {
        self.check_field(model, field).await?;
        self.check_record(model, record_id).await?;

        match value {
            Some(value) => {
                sqlx::query(
                    "INSERT INTO folder_field_values (model, record_id, field_name, stored_value) \
                     VALUES ($1, $2, $3, $4) \
                     ON CONFLICT (model, record_id, field_name) \
                     DO UPDATE SET stored_value = EXCLUDED.stored_value",
                )
                .bind(model)
                .bind(record_id)
                .bind(field)
                .bind(value)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to write field value", e)
                })?;
            }
            None => {
                sqlx::query(
                    "DELETE FROM folder_field_values \
                     WHERE model = $1 AND record_id = $2 AND field_name = $3",
                )
                .bind(model)
                .bind(record_id)
                .bind(field)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to clear field value", e)
                })?;
            }
        }
        Ok(())
    }

    async fn display_name(&self, model: &str, record_id: Uuid) -> AppResult<String> {
        let name: Option<String> = sqlx::query_scalar(
            "SELECT display_name FROM folder_records WHERE model = $1 AND id = $2",
        )
        .bind(model)
        .bind(record_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to read display name", e))?;
        name.ok_or_else(|| AppError::not_found(format!("Record not found: {model}/{record_id}")))
    }
}
