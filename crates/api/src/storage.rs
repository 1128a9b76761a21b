//! Durable storage for generated PNGs.
//!
//! [`LocalFileStorage`] writes under `STORAGE_DIR`, which the router serves
//! at `PUBLIC_BASE_URL`. Other backends plug in through [`FileStorage`].

use std::path::{Component, Path, PathBuf};

use adcraft_core::types::DbId;
use async_trait::async_trait;

/// Errors from the storage backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Invalid storage key '{0}'")]
    InvalidKey(String),

    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A stored object and its public address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub key: String,
    pub url: String,
    pub size_bytes: u64,
}

impl StoredFile {
    /// Last path segment of the key.
    pub fn file_name(&self) -> &str {
        self.key.rsplit('/').next().unwrap_or(&self.key)
    }
}

#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Persist PNG bytes under `key`, overwriting any existing object.
    async fn put_png(&self, key: &str, bytes: &[u8]) -> Result<StoredFile, StorageError>;
}

/// Storage key for a design's output: `designs/{user_id}/{design_id}-{uuid}.png`.
///
/// The random suffix keeps every generation addressable on its own, so a
/// cached URL never shows a newer image.
pub fn design_key(user_id: DbId, design_id: DbId) -> String {
    format!("designs/{user_id}/{design_id}-{}.png", uuid::Uuid::new_v4().simple())
}

/// Filesystem-backed storage.
#[derive(Debug, Clone)]
pub struct LocalFileStorage {
    root: PathBuf,
    public_base_url: String,
}

impl LocalFileStorage {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(key);
        let contained = !key.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !contained {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl FileStorage for LocalFileStorage {
    async fn put_png(&self, key: &str, bytes: &[u8]) -> Result<StoredFile, StorageError> {
        let path = self.path_for(key)?;
        let io_err = |source| StorageError::Io {
            path: path.clone(),
            source,
        };

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }
        tokio::fs::write(&path, bytes).await.map_err(io_err)?;

        tracing::debug!(key, size_bytes = bytes.len(), "Stored file");
        Ok(StoredFile {
            key: key.to_string(),
            url: format!("{}/{key}", self.public_base_url),
            size_bytes: bytes.len() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn design_keys_are_unique_per_call() {
        let a = design_key(7, 42);
        let b = design_key(7, 42);
        assert!(a.starts_with("designs/7/42-"));
        assert!(a.ends_with(".png"));
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn writes_file_and_builds_public_url() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalFileStorage::new(dir.path(), "/storage/");

        let stored = storage.put_png("designs/1/2-abc.png", b"png").await.unwrap();
        assert_eq!(stored.url, "/storage/designs/1/2-abc.png");
        assert_eq!(stored.size_bytes, 3);
        assert_eq!(stored.file_name(), "2-abc.png");
        assert_eq!(
            std::fs::read(dir.path().join("designs/1/2-abc.png")).unwrap(),
            b"png"
        );
    }

    #[tokio::test]
    async fn rejects_keys_escaping_the_root() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalFileStorage::new(dir.path(), "/storage");
        for key in ["../evil.png", "/etc/passwd", "", "a/./b.png"] {
            assert_matches!(
                storage.put_png(key, b"x").await,
                Err(StorageError::InvalidKey(_)),
                "{key}"
            );
        }
    }
}
