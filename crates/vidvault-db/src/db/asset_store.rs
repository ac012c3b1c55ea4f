use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;
use vidvault_core::models::{AssetQuery, NewVideoAsset, VideoAsset};
use vidvault_core::{AppError, MetadataBackend};

use super::{InMemoryAssetStore, PgAssetStore};

/// Metadata store for video assets.
///
/// Every operation is atomic for a single record; nothing spans records.
#[async_trait::async_trait]
pub trait AssetStore: Send + Sync {
    /// Persist a new asset, assigning its id and timestamps.
    async fn insert(&self, asset: NewVideoAsset) -> Result<VideoAsset, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<VideoAsset>, AppError>;

    /// Assets matching `query`, most recently created first (ties broken by id, descending).
    async fn find_many(&self, query: &AssetQuery) -> Result<Vec<VideoAsset>, AppError>;

    /// Remove the asset. Returns `false` when no record with that id existed.
    async fn delete_by_id(&self, id: Uuid) -> Result<bool, AppError>;

    /// Cheap liveness probe for readiness checks.
    async fn health_check(&self) -> Result<(), AppError>;
}

/// Build the store selected by configuration.
///
/// `pool` must be provided for the Postgres backend.
pub fn create_asset_store(
    backend: MetadataBackend,
    pool: Option<PgPool>,
) -> Result<Arc<dyn AssetStore>, AppError> {
    match backend {
        MetadataBackend::Postgres => {
            let pool = pool.ok_or_else(|| {
                AppError::Internal("Postgres asset store requires a connection pool".to_string())
            })?;
            tracing::info!("Initializing PostgreSQL asset store");
            Ok(Arc::new(PgAssetStore::new(pool)))
        }
        MetadataBackend::Memory => {
            tracing::warn!("Using in-memory asset store; records are lost on restart");
            Ok(Arc::new(InMemoryAssetStore::new()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_postgres_store_needs_pool() {
        let result = create_asset_store(MetadataBackend::Postgres, None);
        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[tokio::test]
    async fn test_memory_store_from_factory() {
        let store = create_asset_store(MetadataBackend::Memory, None).unwrap();
        assert!(store.health_check().await.is_ok());
        assert!(store.find_many(&AssetQuery::all()).await.unwrap().is_empty());
    }
}
