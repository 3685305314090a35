//! Backend registry — maps backend codes to configured filesystems.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use foldergate_core::config::storage::{BackendConfig, StorageConfig};
use foldergate_core::error::AppError;
use foldergate_core::result::AppResult;
use foldergate_core::traits::filesystem::FileSystem;

use crate::naming;
use crate::providers::local::LocalFileSystem;

/// A configured storage backend: its configuration plus the instantiated
/// filesystem handle.
#[derive(Debug)]
pub struct Backend {
    config: BackendConfig,
    fs: Arc<dyn FileSystem>,
}

impl Backend {
    /// Backend code used in stored values.
    pub fn code(&self) -> &str {
        &self.config.code
    }

    /// Human-readable backend name.
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Storage protocol of the backend.
    pub fn protocol(&self) -> &str {
        self.fs.protocol()
    }

    /// The backend's root filesystem.
    pub fn filesystem(&self) -> Arc<dyn FileSystem> {
        Arc::clone(&self.fs)
    }

    /// The backend configuration.
    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// Whether this backend is the default for folder-field content.
    pub fn is_default_for_folder_content(&self) -> bool {
        self.config.default_for_folder_content
    }

    /// Prepare path segments for creation under this backend.
    ///
    /// With `sanitize_names` set, forbidden characters are replaced by the
    /// configured replacement; otherwise any forbidden character fails
    /// validation before anything is created.
    pub fn prepare_segments(&self, segments: &[String]) -> AppResult<Vec<String>> {
        if self.config.sanitize_names {
            Ok(segments
                .iter()
                .map(|s| naming::sanitize_name(s, &self.config.sanitize_replace_char))
                .collect())
        } else {
            for segment in segments {
                naming::validate_name(segment)?;
            }
            Ok(segments.to_vec())
        }
    }
}

/// Registry of storage backends, keyed by code.
///
/// Owns the "default for folder content" choice behind an explicit
/// read-through cache that is invalidated on every configuration change.
#[derive(Debug)]
pub struct BackendRegistry {
    backends: RwLock<HashMap<String, Arc<Backend>>>,
    /// Cached default backend code: `None` = not computed yet,
    /// `Some(None)` = computed, no default configured.
    default_code: RwLock<Option<Option<String>>>,
}

impl BackendRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            backends: RwLock::new(HashMap::new()),
            default_code: RwLock::new(None),
        }
    }

    /// Build a registry from configuration, instantiating every backend.
    pub async fn from_config(config: &StorageConfig) -> AppResult<Self> {
        let registry = Self::new();
        for backend in &config.backends {
            registry.register(backend.clone()).await?;
        }
        Ok(registry)
    }

    /// Register a backend, validating its configuration.
    pub async fn register(&self, config: BackendConfig) -> AppResult<()> {
        if config.sanitize_names {
            naming::validate_replace_char(&config.sanitize_replace_char)?;
        }

        let mut backends = self.backends.write().await;
        if backends.contains_key(&config.code) {
            return Err(AppError::conflict(format!(
                "A backend with code '{}' is already registered",
                config.code
            )));
        }
        if config.default_for_folder_content
            && backends.values().any(|b| b.is_default_for_folder_content())
        {
            return Err(AppError::validation(
                "Only one backend can be used as default for folder content",
            ));
        }

        let fs = build_filesystem(&config).await?;
        tracing::info!(code = %config.code, protocol = %config.protocol, "Registered storage backend");
        backends.insert(config.code.clone(), Arc::new(Backend { config, fs }));
        drop(backends);

        self.invalidate_default_cache().await;
        Ok(())
    }

    /// Remove a backend from the registry.
    pub async fn unregister(&self, code: &str) -> AppResult<()> {
        let mut backends = self.backends.write().await;
        backends
            .remove(code)
            .ok_or_else(|| AppError::not_found(format!("Backend '{code}' not found")))?;
        drop(backends);

        self.invalidate_default_cache().await;
        Ok(())
    }

    /// Get a backend by code.
    pub async fn get(&self, code: &str) -> AppResult<Arc<Backend>> {
        let backends = self.backends.read().await;
        backends
            .get(code)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("Backend '{code}' not found")))
    }

    /// Get a backend's root filesystem by code.
    pub async fn get_fs(&self, code: &str) -> AppResult<Arc<dyn FileSystem>> {
        Ok(self.get(code).await?.filesystem())
    }

    /// List all registered backends.
    pub async fn list(&self) -> Vec<Arc<Backend>> {
        let backends = self.backends.read().await;
        let mut all: Vec<Arc<Backend>> = backends.values().cloned().collect();
        all.sort_by(|a, b| a.code().cmp(b.code()));
        all
    }

    /// The code of the backend to use for new folder-field content.
    ///
    /// Read-through cached; invalidated whenever the backend set or the
    /// default flag changes.
    pub async fn default_code_for_folder_content(&self) -> AppResult<String> {
        {
            let cached = self.default_code.read().await;
            if let Some(computed) = cached.as_ref() {
                return computed.clone().ok_or_else(no_default_error);
            }
        }

        let backends = self.backends.read().await;
        let computed = backends
            .values()
            .find(|b| b.is_default_for_folder_content())
            .map(|b| b.code().to_string());
        drop(backends);

        let mut cached = self.default_code.write().await;
        *cached = Some(computed.clone());
        computed.ok_or_else(no_default_error)
    }

    /// Flag a backend as the default for folder content.
    ///
    /// Fails validation when another backend already carries the flag.
    pub async fn set_default_for_folder_content(&self, code: &str) -> AppResult<()> {
        let mut backends = self.backends.write().await;
        let backend = backends
            .get(code)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("Backend '{code}' not found")))?;

        if backend.is_default_for_folder_content() {
            return Ok(());
        }
        if backends.values().any(|b| b.is_default_for_folder_content()) {
            return Err(AppError::validation(
                "Only one backend can be used as default for folder content",
            ));
        }

        let mut config = backend.config.clone();
        config.default_for_folder_content = true;
        backends.insert(
            code.to_string(),
            Arc::new(Backend {
                config,
                fs: backend.filesystem(),
            }),
        );
        drop(backends);

        self.invalidate_default_cache().await;
        Ok(())
    }

    /// Check health of all registered backends.
    pub async fn health_check_all(&self) -> HashMap<String, bool> {
        let backends = {
            let guard = self.backends.read().await;
            guard.values().cloned().collect::<Vec<_>>()
        };
        let mut results = HashMap::new();
        for backend in backends {
            let healthy = backend.filesystem().health_check().await.unwrap_or(false);
            results.insert(backend.code().to_string(), healthy);
        }
        results
    }

    async fn invalidate_default_cache(&self) {
        let mut cached = self.default_code.write().await;
        *cached = None;
    }
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn no_default_error() -> AppError {
    AppError::configuration(
        "No default backend configured for folder content. \
         Flag one backend with default_for_folder_content.",
    )
}

/// Instantiate the filesystem for a backend configuration.
async fn build_filesystem(config: &BackendConfig) -> AppResult<Arc<dyn FileSystem>> {
    match config.protocol.as_str() {
        "local" => Ok(Arc::new(LocalFileSystem::new(&config.root).await?)),
        #[cfg(feature = "s3")]
        "s3" => {
            let fs = crate::providers::s3::S3FileSystem::new(
                option_str(&config.options, "endpoint"),
                option_str(&config.options, "region"),
                option_str(&config.options, "bucket"),
                option_str(&config.options, "access_key"),
                option_str(&config.options, "secret_key"),
            )
            .await?;
            Ok(Arc::new(fs))
        }
        #[cfg(feature = "webdav-client")]
        "webdav" => Ok(Arc::new(crate::providers::webdav::WebDavFileSystem::new(
            option_str(&config.options, "base_url"),
            option_str(&config.options, "username"),
            option_str(&config.options, "password"),
        ))),
        other => Err(AppError::configuration(format!(
            "Unknown storage protocol: {other}"
        ))),
    }
}

/// Read a string option from a backend's option bag.
#[allow(dead_code)]
fn option_str<'a>(options: &'a serde_json::Value, key: &str) -> &'a str {
    options.get(key).and_then(|v| v.as_str()).unwrap_or("")
}
