//! # foldergate-storage
//!
//! Filesystem implementations for FolderGate. Supports the local
//! filesystem and, behind cargo features, S3-compatible object stores and
//! WebDAV servers. Also provides the sandboxed [`RootedFileSystem`] view
//! and the [`BackendRegistry`] that maps backend codes to filesystems.

pub mod naming;
pub mod providers;
pub mod registry;
pub mod sandbox;

pub use registry::{Backend, BackendRegistry};
pub use sandbox::RootedFileSystem;
