//! FolderGate Server — folders on external filesystems, attached to records.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use foldergate_core::config::AppConfig;
use foldergate_core::error::AppError;
use foldergate_core::traits::access::AccessPolicy;
use foldergate_core::traits::record::FieldValueStore;
use foldergate_service::access::RoleAccessPolicy;
use foldergate_service::adapter::{DefaultValueAdapter, ValueAdapter};
use foldergate_service::content::FolderContentService;
use foldergate_service::create::FolderCreator;
use foldergate_service::store::memory::MemoryFieldStore;
use foldergate_service::store::postgres::PostgresFieldStore;
use foldergate_storage::registry::BackendRegistry;

#[tokio::main]
async fn main() {
    let env = std::env::var("FOLDERGATE_ENV").unwrap_or_else(|_| "development".to_string());
    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting FolderGate v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Storage backends ─────────────────────────────────
    tracing::info!("Initializing storage backends...");
    let registry = Arc::new(BackendRegistry::from_config(&config.storage).await?);
    tracing::info!(
        backends = config.storage.backends.len(),
        "Storage backends initialized"
    );

    // ── Step 2: Field value store ────────────────────────────────
    tracing::info!(provider = %config.store.provider, "Initializing field value store...");
    let store: Arc<dyn FieldValueStore> = match config.store.provider.as_str() {
        "memory" => Arc::new(MemoryFieldStore::new()),
        "postgres" => {
            let store = PostgresFieldStore::connect(&config.store).await?;
            store.ensure_schema().await?;
            Arc::new(store)
        }
        other => {
            return Err(AppError::configuration(format!(
                "Unknown store provider: {other}"
            )));
        }
    };

    // ── Step 3: Folder-field services ────────────────────────────
    let adapter: Arc<dyn ValueAdapter> = Arc::new(DefaultValueAdapter);
    let access: Arc<dyn AccessPolicy> = Arc::new(RoleAccessPolicy);
    let creator = FolderCreator::new(
        Arc::clone(&registry),
        Arc::clone(&store),
        Arc::clone(&adapter),
        config.folder.clone(),
    );
    let content_service = Arc::new(FolderContentService::new(
        Arc::clone(&registry),
        store,
        adapter,
        access,
        creator,
    ));

    // ── Step 4: HTTP server ──────────────────────────────────────
    let app_state = foldergate_api::state::AppState {
        config: Arc::new(config.clone()),
        registry: Arc::clone(&registry),
        content_service,
    };

    let app = foldergate_api::router::build_router(app_state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("FolderGate server listening on {addr}");

    // ── Step 5: Graceful shutdown ────────────────────────────────
    let server = axum::serve(listener, app).with_graceful_shutdown(async {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
    });

    server
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    tracing::info!("FolderGate server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
