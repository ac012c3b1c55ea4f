#[cfg(feature = "hosted")]
use crate::HostedBlobStore;
#[cfg(feature = "storage-local")]
use crate::LocalBlobStore;
#[cfg(feature = "storage-s3")]
use crate::S3BlobStore;
use crate::{BlobBackend, BlobStore, BlobStoreError, BlobStoreResult};
use std::sync::Arc;
use vidvault_core::Config;

/// Create a blob store based on configuration
pub async fn create_blob_store(config: &Config) -> BlobStoreResult<Arc<dyn BlobStore>> {
    match config.blob_backend() {
        #[cfg(feature = "hosted")]
        BlobBackend::Hosted => {
            let private_key = config.blob_private_key().ok_or_else(|| {
                BlobStoreError::ConfigError("BLOB_PRIVATE_KEY not configured".to_string())
            })?;
            let public_key = config.blob_public_key().ok_or_else(|| {
                BlobStoreError::ConfigError("BLOB_PUBLIC_KEY not configured".to_string())
            })?;

            let store = HostedBlobStore::new(
                config.blob_api_url(),
                public_key,
                private_key,
                std::time::Duration::from_secs(config.blob_request_timeout_secs()),
            )?;
            Ok(Arc::new(store))
        }

        #[cfg(not(feature = "hosted"))]
        BlobBackend::Hosted => Err(BlobStoreError::ConfigError(
            "Hosted blob backend not available (hosted feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-s3")]
        BlobBackend::S3 => {
            let bucket = config
                .s3_bucket()
                .map(String::from)
                .ok_or_else(|| BlobStoreError::ConfigError("S3_BUCKET not configured".to_string()))?;
            let region = config.s3_region().map(String::from).ok_or_else(|| {
                BlobStoreError::ConfigError("S3_REGION or AWS_REGION not configured".to_string())
            })?;
            let endpoint = config.s3_endpoint().map(String::from);

            let store = S3BlobStore::new(bucket, region, endpoint)?;
            Ok(Arc::new(store))
        }

        #[cfg(not(feature = "storage-s3"))]
        BlobBackend::S3 => Err(BlobStoreError::ConfigError(
            "S3 blob backend not available (storage-s3 feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-local")]
        BlobBackend::Local => {
            let base_path = config.local_storage_path().ok_or_else(|| {
                BlobStoreError::ConfigError("LOCAL_STORAGE_PATH not configured".to_string())
            })?;

            let store = LocalBlobStore::new(base_path).await?;
            Ok(Arc::new(store))
        }

        #[cfg(not(feature = "storage-local"))]
        BlobBackend::Local => Err(BlobStoreError::ConfigError(
            "Local blob backend not available (storage-local feature not enabled)".to_string(),
        )),
    }
}
