//! Value adapter — converts between created paths, stored values, and
//! sandboxed filesystem views.

use async_trait::async_trait;

use foldergate_core::result::AppResult;
use foldergate_core::traits::filesystem::FileSystem;
use foldergate_storage::registry::BackendRegistry;
use foldergate_storage::sandbox::RootedFileSystem;

use crate::value::FolderValue;

/// Conversion seam between folder references and stored values.
///
/// The default implementation stores the created path directly. Backends
/// without stable paths (e.g. drives addressing folders by opaque IDs)
/// provide their own adapter that overrides [`encode`](ValueAdapter::encode)
/// to store an immutable identifier, and [`decode`](ValueAdapter::decode)
/// to map it back.
#[async_trait]
pub trait ValueAdapter: Send + Sync + std::fmt::Debug + 'static {
    /// Convert a just-created folder path into the stored value.
    ///
    /// `fs` is the backend's root filesystem, available to adapters that
    /// need to look up backend-specific identifiers for the new folder.
    async fn encode(
        &self,
        created_path: &str,
        backend_code: &str,
        _fs: &dyn FileSystem,
    ) -> AppResult<String> {
        Ok(format!(
            "{backend_code}://{}",
            created_path.trim_start_matches('/')
        ))
    }

    /// Parse a stored value into a [`FolderValue`].
    ///
    /// The stored value is split on the first `://`; an empty or absent
    /// input yields an unset value.
    fn decode(&self, stored: Option<&str>) -> FolderValue {
        let Some(stored) = stored.filter(|s| !s.is_empty()) else {
            return FolderValue::unset();
        };
        let (backend_code, reference) = match stored.find("://") {
            Some(idx) => (&stored[..idx], &stored[idx + 3..]),
            None => (stored, ""),
        };
        FolderValue::from_parts(
            stored.to_string(),
            Some(reference.to_string()),
            Some(backend_code.to_string()),
        )
    }

    /// Resolve a value to a sandboxed view over its backend.
    ///
    /// Returns `None` when the reference is empty. An unknown backend code
    /// is a not-found error. The view is constructed without touching the
    /// backend, so a reference pointing to a folder that was moved or
    /// deleted upstream resolves successfully and fails at operation time
    /// with a user-facing message.
    async fn resolve(
        &self,
        value: &FolderValue,
        registry: &BackendRegistry,
    ) -> AppResult<Option<RootedFileSystem>> {
        let Some(reference) = value.reference().filter(|r| !r.is_empty()) else {
            return Ok(None);
        };
        let code = value.backend_code().unwrap_or_default();
        let fs = registry.get_fs(code).await?;
        Ok(Some(RootedFileSystem::new(fs, reference)?))
    }
}

/// The default adapter: the reference is the folder's path.
#[derive(Debug, Clone, Default)]
pub struct DefaultValueAdapter;

impl ValueAdapter for DefaultValueAdapter {}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_encode_decode_roundtrip() {
        let adapter = DefaultValueAdapter;
        let fs = noop_fs().await;

        for (reference, code) in [
            ("projects/alpha", "tmp_dir"),
            ("a", "b"),
            ("deep/nested/dir", "s3_main"),
        ] {
            let stored = adapter.encode(reference, code, fs.as_ref()).await.unwrap();
            let value = adapter.decode(Some(&stored));
            assert_eq!(value.reference(), Some(reference));
            assert_eq!(value.backend_code(), Some(code));
        }
    }

    #[tokio::test]
    async fn test_encode_strips_leading_slash() {
        let adapter = DefaultValueAdapter;
        let fs = noop_fs().await;
        let stored = adapter.encode("/rooted/path", "code", fs.as_ref()).await.unwrap();
        assert_eq!(stored, "code://rooted/path");
    }

    #[test]
    fn test_decode_empty_is_unset() {
        let adapter = DefaultValueAdapter;
        assert!(!adapter.decode(None).is_set());
        assert!(!adapter.decode(Some("")).is_set());

        let value = adapter.decode(None);
        assert_eq!(value.reference(), None);
        assert_eq!(value.backend_code(), None);
    }

    #[test]
    fn test_decode_without_separator() {
        let adapter = DefaultValueAdapter;
        let value = adapter.decode(Some("just_a_code"));
        assert_eq!(value.backend_code(), Some("just_a_code"));
        assert_eq!(value.reference(), Some(""));
    }

    #[tokio::test]
    async fn test_resolve_empty_reference_is_none() {
        let adapter = DefaultValueAdapter;
        let registry = BackendRegistry::new();

        let resolved = adapter
            .resolve(&FolderValue::unset(), &registry)
            .await
            .unwrap();
        assert!(resolved.is_none());

        let value = adapter.decode(Some("just_a_code"));
        let resolved = adapter.resolve(&value, &registry).await.unwrap();
        assert!(resolved.is_none());
    }

    #[tokio::test]
    async fn test_resolve_unknown_backend_fails() {
        let adapter = DefaultValueAdapter;
        let registry = BackendRegistry::new();
        let value = adapter.decode(Some("ghost://some/folder"));

        let err = adapter.resolve(&value, &registry).await.unwrap_err();
        assert_eq!(err.kind, foldergate_core::error::ErrorKind::NotFound);
    }

    async fn noop_fs() -> std::sync::Arc<dyn FileSystem> {
        let dir = tempfile::tempdir().unwrap();
        let fs = foldergate_storage::providers::local::LocalFileSystem::new(
            dir.path().to_str().unwrap(),
        )
        .await
        .unwrap();
        std::sync::Arc::new(fs)
    }
}
