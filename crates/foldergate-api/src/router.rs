//! Route definitions for the FolderGate HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.
//! The router receives `AppState` and passes it to all handlers via Axum's
//! `State` extractor.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{delete, get, post, put},
};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
///
/// Receives the fully-constructed `AppState` and threads it through
/// every route via `.with_state(state)`.
pub fn build_router(state: AppState) -> Router {
    let max_upload = state.config.storage.max_upload_size_bytes as usize;

    let api_routes = Router::new()
        .merge(folder_routes())
        .merge(backend_routes())
        .merge(health_routes());

    let cors = build_cors_layer(&state);

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(max_upload))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .with_state(state)
}

/// Folder-field content endpoints
fn folder_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/folder/{model}/{id}/{field}/children",
            get(handlers::folder::get_children),
        )
        .route(
            "/folder/{model}/{id}/{field}/root",
            get(handlers::folder::get_root),
        )
        .route(
            "/folder/{model}/{id}/{field}/value",
            get(handlers::folder::get_value),
        )
        .route(
            "/folder/{model}/{id}/{field}/value",
            delete(handlers::folder::remove_value),
        )
        .route(
            "/folder/{model}/{id}/{field}/folders",
            post(handlers::folder::create_folder),
        )
        .route(
            "/folder/{model}/{id}/{field}/rename",
            post(handlers::folder::rename),
        )
        .route(
            "/folder/{model}/{id}/{field}/move",
            post(handlers::folder::move_entry),
        )
        .route(
            "/folder/{model}/{id}/{field}/copy",
            post(handlers::folder::copy_entry),
        )
        .route(
            "/folder/{model}/{id}/{field}/upload",
            post(handlers::folder::upload),
        )
        .route(
            "/folder/{model}/{id}/{field}/content",
            put(handlers::folder::update_content),
        )
        .route(
            "/folder/{model}/{id}/{field}/delete",
            post(handlers::folder::delete_entry),
        )
        .route(
            "/folder/{model}/{id}/{field}/initialize",
            post(handlers::folder::initialize),
        )
        .route(
            "/folder/{model}/{id}/{field}/file",
            get(handlers::folder::get_file),
        )
        .route(
            "/folder/{model}/{id}/{field}",
            delete(handlers::folder::delete_folder),
        )
}

/// Backend configuration endpoints
fn backend_routes() -> Router<AppState> {
    Router::new()
        .route("/backends", get(handlers::backend::list_backends))
        .route("/backends/{code}", get(handlers::backend::get_backend))
        .route(
            "/backends/{code}/health",
            get(handlers::backend::backend_health),
        )
        .route(
            "/backends/{code}/default",
            put(handlers::backend::set_default),
        )
}

/// Health check endpoints (no auth required)
fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/health/detailed", get(handlers::health::detailed_health))
}

/// Build CORS layer from configuration
fn build_cors_layer(state: &AppState) -> CorsLayer {
    use http::Method;
    use tower_http::cors::Any;

    let cors_config = &state.config.server.cors;

    let mut cors = CorsLayer::new();

    if cors_config.allowed_origins.contains(&"*".to_string()) {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<http::HeaderValue> = cors_config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors = cors.allow_origin(origins);
    }

    let methods: Vec<Method> = cors_config
        .allowed_methods
        .iter()
        .filter_map(|m| m.parse().ok())
        .collect();
    cors = cors.allow_methods(methods);

    if cors_config.allowed_headers.contains(&"*".to_string()) {
        cors = cors.allow_headers(Any);
    }

    cors = cors.max_age(std::time::Duration::from_secs(cors_config.max_age_seconds));

    cors
}
