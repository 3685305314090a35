//! Shared test helpers for integration tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use bytes::Bytes;
use http::header::HeaderMap;
use http::{Request, StatusCode};
use serde_json::Value;
use tower::util::ServiceExt;
use uuid::Uuid;

use foldergate_api::extractors::auth::encode_token;
use foldergate_api::state::AppState;
use foldergate_core::config::AppConfig;
use foldergate_core::config::storage::BackendConfig;
use foldergate_core::traits::access::{AccessPolicy, UserRole};
use foldergate_core::traits::filesystem::FileSystem;
use foldergate_core::traits::record::FieldValueStore;
use foldergate_service::access::RoleAccessPolicy;
use foldergate_service::adapter::{DefaultValueAdapter, ValueAdapter};
use foldergate_service::content::FolderContentService;
use foldergate_service::create::FolderCreator;
use foldergate_service::store::memory::MemoryFieldStore;
use foldergate_storage::registry::BackendRegistry;

/// Seeded folder layout used by most tests.
pub const TEXT_FILES: [(&str, &str); 4] = [
    ("nested/file1", "hello\n"),
    ("nested/file2", "world"),
    ("nested/nested2/file1", "hello\n"),
    ("nested/nested2/file2", "world"),
];

/// Test application context.
pub struct TestApp {
    /// The Axum router for making test requests.
    pub router: Router,
    /// Storage backend registry.
    pub registry: Arc<BackendRegistry>,
    /// In-memory field value store.
    pub store: Arc<MemoryFieldStore>,
    /// A "project" record whose `documents` field points at `nested/`.
    pub record_id: Uuid,
    /// Application config.
    pub config: AppConfig,
    _dir: tempfile::TempDir,
}

/// A collected response: status, headers, raw body, and parsed JSON when
/// the body is JSON.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub bytes: Bytes,
    pub body: Value,
}

impl TestApp {
    /// Create a new test application with a tempdir-backed local backend.
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();

        let mut config = AppConfig::default();
        config.auth.jwt_secret = "integration-test-secret".to_string();
        config.folder.disable_rollback_cleanup = true;
        config.storage.backends = vec![BackendConfig {
            name: "Temp".to_string(),
            code: "tmp_dir".to_string(),
            protocol: "local".to_string(),
            root: dir.path().to_str().unwrap().to_string(),
            options: serde_json::Value::Null,
            default_for_folder_content: true,
            sanitize_names: true,
            sanitize_replace_char: "_".to_string(),
        }];

        let registry = Arc::new(BackendRegistry::from_config(&config.storage).await.unwrap());

        let fs = registry.get_fs("tmp_dir").await.unwrap();
        for (path, data) in TEXT_FILES {
            fs.write_bytes(path, Bytes::from(data)).await.unwrap();
        }

        let store = Arc::new(MemoryFieldStore::new());
        store
            .register_model("project", &["documents", "attachments"])
            .await;
        let record_id = store.create_record("project", "nested_content").await.unwrap();
        store
            .set_value("project", record_id, "documents", Some("tmp_dir://nested"))
            .await
            .unwrap();

        let store_dyn: Arc<dyn FieldValueStore> = store.clone();
        let adapter: Arc<dyn ValueAdapter> = Arc::new(DefaultValueAdapter);
        let access: Arc<dyn AccessPolicy> = Arc::new(RoleAccessPolicy);
        let creator = FolderCreator::new(
            Arc::clone(&registry),
            Arc::clone(&store_dyn),
            Arc::clone(&adapter),
            config.folder.clone(),
        );
        let content_service = Arc::new(FolderContentService::new(
            Arc::clone(&registry),
            store_dyn,
            adapter,
            access,
            creator,
        ));

        let state = AppState {
            config: Arc::new(config.clone()),
            registry: Arc::clone(&registry),
            content_service,
        };
        let router = foldergate_api::router::build_router(state);

        Self {
            router,
            registry,
            store,
            record_id,
            config,
            _dir: dir,
        }
    }

    /// Mint an access token for the given role.
    pub fn token(&self, role: UserRole) -> String {
        encode_token(
            Uuid::new_v4(),
            "tester",
            role,
            &self.config.auth.jwt_secret,
            15,
        )
        .unwrap()
    }

    /// Send a request through the router and collect the response.
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let (parts, body) = response.into_parts();
        let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
        let parsed = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status: parts.status,
            headers: parts.headers,
            bytes,
            body: parsed,
        }
    }

    /// URL of a folder-field endpoint for the seeded record.
    pub fn folder_url(&self, suffix: &str) -> String {
        format!("/api/folder/project/{}/documents{suffix}", self.record_id)
    }
}

/// Sorted entry names from a children-listing response body.
pub fn listed_names(body: &Value) -> Vec<String> {
    let mut names: Vec<String> = body["data"]
        .as_array()
        .expect("data must be an array")
        .iter()
        .map(|item| item["name"].as_str().unwrap().to_string())
        .collect();
    names.sort();
    names
}
