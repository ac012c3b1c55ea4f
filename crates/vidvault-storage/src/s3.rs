use crate::traits::{
    validate_key, BlobFailureKind, BlobOutcome, BlobStore, BlobStoreError, BlobStoreResult,
};
use crate::BlobBackend;
use async_trait::async_trait;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path;
use object_store::Error as ObjectStoreError;
use object_store::{ObjectStoreExt, Result as ObjectResult};

/// S3 blob store; external ids are object keys
#[derive(Clone)]
pub struct S3BlobStore {
    store: AmazonS3,
    bucket: String,
}

impl S3BlobStore {
    /// Create a new S3BlobStore instance
    ///
    /// # Arguments
    /// * `bucket` - S3 bucket name
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint URL for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO)
    pub fn new(bucket: String, region: String, endpoint_url: Option<String>) -> BlobStoreResult<Self> {
        // Credentials come from the standard AWS environment variables.
        let mut builder = AmazonS3Builder::from_env()
            .with_region(region)
            .with_bucket_name(bucket.clone());

        if let Some(endpoint) = endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder.with_endpoint(endpoint).with_allow_http(allow_http);
        }

        let store = builder
            .build()
            .map_err(|e| BlobStoreError::ConfigError(e.to_string()))?;

        Ok(S3BlobStore { store, bucket })
    }
}

fn classify_error(err: &ObjectStoreError) -> BlobFailureKind {
    match err {
        ObjectStoreError::NotFound { .. } => BlobFailureKind::NotFound,
        ObjectStoreError::PermissionDenied { .. } | ObjectStoreError::Unauthenticated { .. } => {
            BlobFailureKind::Unauthorized
        }
        ObjectStoreError::InvalidPath { .. } => BlobFailureKind::Rejected,
        ObjectStoreError::NotSupported { .. } | ObjectStoreError::UnknownConfigurationKey { .. } => {
            BlobFailureKind::Misconfigured
        }
        _ => BlobFailureKind::Transient,
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn delete_object(&self, external_id: &str) -> BlobOutcome {
        if let Err(e) = validate_key(external_id) {
            return BlobOutcome::failed(BlobFailureKind::Rejected, e.to_string());
        }

        let start = std::time::Instant::now();
        let location = Path::from(external_id.to_string());

        let result: ObjectResult<_> = self.store.delete(&location).await;

        match result {
            Ok(()) => {
                tracing::info!(
                    bucket = %self.bucket,
                    key = %external_id,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 delete successful"
                );
                BlobOutcome::Ok
            }
            Err(e) => {
                tracing::debug!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %external_id,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 delete failed"
                );
                BlobOutcome::failed(classify_error(&e), e.to_string())
            }
        }
    }

    fn backend_type(&self) -> BlobBackend {
        BlobBackend::S3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_not_found() {
        let err = ObjectStoreError::NotFound {
            path: "videos/a.mp4".to_string(),
            source: "missing".into(),
        };
        assert_eq!(classify_error(&err), BlobFailureKind::NotFound);
    }

    #[test]
    fn test_classify_generic_is_transient() {
        let err = ObjectStoreError::Generic {
            store: "S3",
            source: "connection reset".into(),
        };
        assert_eq!(classify_error(&err), BlobFailureKind::Transient);
    }

    #[tokio::test]
    async fn test_invalid_key_rejected_without_request() {
        let store = S3BlobStore::new(
            "bucket".to_string(),
            "us-east-1".to_string(),
            Some("http://127.0.0.1:1".to_string()),
        )
        .unwrap();
        let outcome = store.delete_object("../escape").await;
        assert_eq!(outcome.failure().unwrap().kind, BlobFailureKind::Rejected);
    }
}
