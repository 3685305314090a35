//! # foldergate-api
//!
//! HTTP API layer for FolderGate built on Axum.
//!
//! Provides the folder-field endpoints, backend configuration endpoints,
//! middleware (auth, CORS, logging), extractors, DTOs, and error mapping.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
