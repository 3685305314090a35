//! # foldergate-service
//!
//! Folder-field domain logic: the [`FolderValue`] value type and its
//! [`ValueAdapter`] encoding seam, batch folder creation with rollback
//! compensation, the [`FolderContentService`] proxy behind the web API,
//! content streaming, and the field value stores.

pub mod access;
pub mod adapter;
pub mod content;
pub mod context;
pub mod create;
pub mod store;
pub mod stream;
pub mod value;

pub use adapter::{DefaultValueAdapter, ValueAdapter};
pub use content::FolderContentService;
pub use context::RequestContext;
pub use create::{FieldSpec, FolderCreator};
pub use value::{FolderValue, FolderValueInfo};
