//! Backend configuration handlers.

use axum::Json;
use axum::extract::{Path, State};

use foldergate_core::error::AppError;

use crate::dto::response::{ApiResponse, BackendResponse, MessageResponse};
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

fn to_response(backend: &foldergate_storage::registry::Backend) -> BackendResponse {
    let config = backend.config();
    BackendResponse {
        name: config.name.clone(),
        code: config.code.clone(),
        protocol: backend.protocol().to_string(),
        default_for_folder_content: config.default_for_folder_content,
        sanitize_names: config.sanitize_names,
    }
}

/// GET /api/backends
pub async fn list_backends(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> ApiResult<Json<ApiResponse<Vec<BackendResponse>>>> {
    let backends = state.registry.list().await;
    let items = backends.iter().map(|b| to_response(b)).collect();
    Ok(Json(ApiResponse::ok(items)))
}

/// GET /api/backends/{code}
pub async fn get_backend(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(code): Path<String>,
) -> ApiResult<Json<ApiResponse<BackendResponse>>> {
    let backend = state.registry.get(&code).await?;
    Ok(Json(ApiResponse::ok(to_response(&backend))))
}

/// GET /api/backends/{code}/health
pub async fn backend_health(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(code): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let backend = state.registry.get(&code).await?;
    let healthy = backend.filesystem().health_check().await.unwrap_or(false);
    Ok(Json(
        serde_json::json!({ "success": true, "data": { "code": code, "healthy": healthy } }),
    ))
}

/// PUT /api/backends/{code}/default
pub async fn set_default(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(code): Path<String>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    if !auth.is_admin() {
        return Err(AppError::access_denied("Backend administration requires the admin role").into());
    }
    state
        .registry
        .set_default_for_folder_content(&code)
        .await?;
    Ok(Json(ApiResponse::ok(MessageResponse {
        message: format!("Backend '{code}' is now the default for folder content"),
    })))
}
