//! Folder-field content handlers.

use axum::Json;
use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::Response;
use uuid::Uuid;

use foldergate_core::error::AppError;

use crate::dto::request::{
    ChildrenQuery, CreateFolderRequest, DeleteRequest, FileQuery, RenameRequest,
    TransferRequest, UpdateContentRequest, UploadRequest,
};
use crate::dto::response::{ApiResponse, EntryResponse, MessageResponse};
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

type FieldPath = Path<(String, Uuid, String)>;

/// GET /api/folder/{model}/{id}/{field}/children?path=
pub async fn get_children(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((model, id, field)): FieldPath,
    Query(query): Query<ChildrenQuery>,
) -> ApiResult<Json<ApiResponse<Vec<EntryResponse>>>> {
    let entries = state
        .content_service
        .get_children(&auth, &model, id, &field, &query.path)
        .await?;
    let items = entries
        .into_iter()
        .map(|e| EntryResponse::from_entry(e, &query.path))
        .collect();
    Ok(Json(ApiResponse::ok(items)))
}

/// GET /api/folder/{model}/{id}/{field}/root
pub async fn get_root(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((model, id, field)): FieldPath,
) -> ApiResult<Json<serde_json::Value>> {
    let root = state
        .content_service
        .get_root(&auth, &model, id, &field)
        .await?;
    Ok(Json(serde_json::json!({ "success": true, "data": root })))
}

/// GET /api/folder/{model}/{id}/{field}/value
pub async fn get_value(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((model, id, field)): FieldPath,
) -> ApiResult<Json<serde_json::Value>> {
    let info = state
        .content_service
        .value_info(&auth, &model, id, &field)
        .await?;
    Ok(Json(serde_json::json!({ "success": true, "data": info })))
}

/// POST /api/folder/{model}/{id}/{field}/folders
pub async fn create_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((model, id, field)): FieldPath,
    Json(req): Json<CreateFolderRequest>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state
        .content_service
        .create_folder(&auth, &model, id, &field, &join_path(&req.path, &req.name))
        .await?;
    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Folder created".to_string(),
    })))
}

/// POST /api/folder/{model}/{id}/{field}/rename
pub async fn rename(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((model, id, field)): FieldPath,
    Json(req): Json<RenameRequest>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state
        .content_service
        .rename(
            &auth,
            &model,
            id,
            &field,
            &join_path(&req.path, &req.name),
            &join_path(&req.path, &req.new_name),
        )
        .await?;
    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Renamed".to_string(),
    })))
}

/// POST /api/folder/{model}/{id}/{field}/move
pub async fn move_entry(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((model, id, field)): FieldPath,
    Json(req): Json<TransferRequest>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    if req.origin_path != req.path {
        state
            .content_service
            .rename(
                &auth,
                &model,
                id,
                &field,
                &join_path(&req.origin_path, &req.entry),
                &join_path(&req.path, &req.entry),
            )
            .await?;
    }
    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Moved".to_string(),
    })))
}

/// POST /api/folder/{model}/{id}/{field}/copy
pub async fn copy_entry(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((model, id, field)): FieldPath,
    Json(req): Json<TransferRequest>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    if req.origin_path != req.path {
        state
            .content_service
            .copy_item(
                &auth,
                &model,
                id,
                &field,
                &join_path(&req.origin_path, &req.entry),
                &join_path(&req.path, &req.entry),
                true,
            )
            .await?;
    }
    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Copied".to_string(),
    })))
}

/// POST /api/folder/{model}/{id}/{field}/upload
pub async fn upload(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((model, id, field)): FieldPath,
    Json(req): Json<UploadRequest>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state
        .content_service
        .upload_file(&auth, &model, id, &field, &req.path, &req.name, &req.data)
        .await?;
    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Uploaded".to_string(),
    })))
}

/// PUT /api/folder/{model}/{id}/{field}/content
pub async fn update_content(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((model, id, field)): FieldPath,
    Json(req): Json<UpdateContentRequest>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state
        .content_service
        .update_content(&auth, &model, id, &field, &req.path, &req.data)
        .await?;
    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Updated".to_string(),
    })))
}

/// POST /api/folder/{model}/{id}/{field}/delete
pub async fn delete_entry(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((model, id, field)): FieldPath,
    Json(req): Json<DeleteRequest>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state
        .content_service
        .delete(
            &auth,
            &model,
            id,
            &field,
            &join_path(&req.path, &req.name),
            req.recursive,
        )
        .await?;
    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Deleted".to_string(),
    })))
}

/// POST /api/folder/{model}/{id}/{field}/initialize
pub async fn initialize(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((model, id, field)): FieldPath,
) -> ApiResult<Json<serde_json::Value>> {
    state
        .content_service
        .initialize(&auth, &model, id, &field)
        .await?;
    let info = state
        .content_service
        .value_info(&auth, &model, id, &field)
        .await?;
    Ok(Json(serde_json::json!({ "success": true, "data": info })))
}

/// DELETE /api/folder/{model}/{id}/{field}/value
pub async fn remove_value(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((model, id, field)): FieldPath,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state
        .content_service
        .remove_value(&auth, &model, id, &field)
        .await?;
    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Value removed".to_string(),
    })))
}

/// DELETE /api/folder/{model}/{id}/{field}
pub async fn delete_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((model, id, field)): FieldPath,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state
        .content_service
        .delete_folder(&auth, &model, id, &field)
        .await?;
    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "Folder deleted".to_string(),
    })))
}

/// GET /api/folder/{model}/{id}/{field}/file?path=&download=
///
/// Streams file content with conditional-GET support (ETag) and an
/// inline or attachment disposition.
pub async fn get_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((model, id, field)): FieldPath,
    Query(query): Query<FileQuery>,
    headers: HeaderMap,
) -> ApiResult<Response> {
    let content = state
        .content_service
        .stream(&auth, &model, id, &field, &query.path)
        .await?;

    let etag = content.etag.as_ref().map(|tag| format!("\"{tag}\""));

    // Conditional GET: a matching If-None-Match short-circuits to 304.
    let if_none_match = headers
        .get(header::IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok());
    if let (Some(etag), Some(candidates)) = (etag.as_deref(), if_none_match) {
        if candidates.split(',').any(|c| c.trim() == etag) {
            let response = Response::builder()
                .status(StatusCode::NOT_MODIFIED)
                .header(header::ETAG, etag)
                .body(Body::empty())
                .map_err(|e| AppError::internal(format!("Response build failed: {e}")))?;
            return Ok(response);
        }
    }

    let disposition = if query.as_attachment() {
        format!("attachment; filename=\"{}\"", content.filename)
    } else {
        format!("inline; filename=\"{}\"", content.filename)
    };

    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content.mime_type.clone())
        .header(header::CONTENT_LENGTH, content.size_bytes)
        .header(header::CONTENT_DISPOSITION, disposition)
        .header(header::X_CONTENT_TYPE_OPTIONS, "nosniff")
        .header(header::CONTENT_SECURITY_POLICY, "default-src 'none'");

    if let Some(etag) = etag {
        builder = builder.header(header::ETAG, etag);
    }
    if let Some(modified) = content.last_modified {
        builder = builder.header(
            header::LAST_MODIFIED,
            modified.format("%a, %d %b %Y %H:%M:%S GMT").to_string(),
        );
    }

    let response = builder
        .body(Body::from_stream(content.stream))
        .map_err(|e| AppError::internal(format!("Response build failed: {e}")))?;

    Ok(response)
}

/// Join a parent path and an entry name, tolerating an empty parent.
fn join_path(path: &str, name: &str) -> String {
    let path = path.trim_matches('/');
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{path}/{name}")
    }
}
