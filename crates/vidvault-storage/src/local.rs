use crate::traits::{
    validate_key, BlobFailureKind, BlobOutcome, BlobStore, BlobStoreError, BlobStoreResult,
};
use crate::BlobBackend;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs;

/// Local filesystem blob store; external ids are paths relative to `base_path`
#[derive(Clone)]
pub struct LocalBlobStore {
    base_path: PathBuf,
}

impl LocalBlobStore {
    /// Create a new LocalBlobStore, creating the root directory if needed
    pub async fn new(base_path: impl Into<PathBuf>) -> BlobStoreResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            BlobStoreError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalBlobStore { base_path })
    }

    /// Convert an external id to a filesystem path below the root.
    fn key_to_path(&self, external_id: &str) -> BlobStoreResult<PathBuf> {
        validate_key(external_id)?;

        let path = self.base_path.join(external_id);
        if !path.starts_with(&self.base_path) {
            return Err(BlobStoreError::InvalidKey(
                "external id resolves outside storage directory".to_string(),
            ));
        }
        Ok(path)
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn delete_object(&self, external_id: &str) -> BlobOutcome {
        let path = match self.key_to_path(external_id) {
            Ok(path) => path,
            Err(e) => return BlobOutcome::failed(BlobFailureKind::Rejected, e.to_string()),
        };

        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!(
                    path = %path.display(),
                    key = %external_id,
                    "Local storage delete successful"
                );
                BlobOutcome::Ok
            }
            Err(e) => {
                let kind = match e.kind() {
                    ErrorKind::NotFound => BlobFailureKind::NotFound,
                    ErrorKind::PermissionDenied => BlobFailureKind::Unauthorized,
                    _ => BlobFailureKind::Transient,
                };
                BlobOutcome::failed(
                    kind,
                    format!("Failed to delete file {}: {}", path.display(), e),
                )
            }
        }
    }

    fn backend_type(&self) -> BlobBackend {
        BlobBackend::Local
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_delete_existing_file() {
        let dir = TempDir::new().unwrap();
        let store = LocalBlobStore::new(dir.path()).await.unwrap();
        fs::create_dir_all(dir.path().join("videos")).await.unwrap();
        fs::write(dir.path().join("videos/a.mp4"), b"data").await.unwrap();

        assert_eq!(store.delete_object("videos/a.mp4").await, BlobOutcome::Ok);
        assert!(!dir.path().join("videos/a.mp4").exists());
    }

    #[tokio::test]
    async fn test_delete_missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = LocalBlobStore::new(dir.path()).await.unwrap();

        let outcome = store.delete_object("videos/missing.mp4").await;
        assert_eq!(outcome.failure().unwrap().kind, BlobFailureKind::NotFound);
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let dir = TempDir::new().unwrap();
        let store = LocalBlobStore::new(dir.path().join("root")).await.unwrap();
        fs::write(dir.path().join("outside.txt"), b"keep").await.unwrap();

        let outcome = store.delete_object("../outside.txt").await;
        assert_eq!(outcome.failure().unwrap().kind, BlobFailureKind::Rejected);
        assert!(dir.path().join("outside.txt").exists());
    }

    #[tokio::test]
    async fn test_creates_base_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a/b/c");
        LocalBlobStore::new(&nested).await.unwrap();
        assert!(nested.is_dir());
        assert_eq!(
            LocalBlobStore::new(&nested).await.unwrap().backend_type(),
            BlobBackend::Local
        );
    }
}
