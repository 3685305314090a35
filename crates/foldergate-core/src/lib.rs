//! # foldergate-core
//!
//! Core crate for FolderGate. Contains the filesystem, field-store, and
//! access-policy traits, configuration schemas, and the unified error
//! system.
//!
//! This crate has **no** internal dependencies on other FolderGate crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use error::AppError;
pub use result::AppResult;
