//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use foldergate_core::config::AppConfig;
use foldergate_service::content::FolderContentService;
use foldergate_storage::registry::BackendRegistry;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Storage backend registry.
    pub registry: Arc<BackendRegistry>,
    /// Folder content service.
    pub content_service: Arc<FolderContentService>,
}
