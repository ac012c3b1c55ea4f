use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;
use vidvault_core::models::{AssetQuery, NewVideoAsset, VideoAsset};
use vidvault_core::AppError;

use super::AssetStore;

#[derive(Default)]
struct Inner {
    assets: HashMap<Uuid, VideoAsset>,
    last_created_at: Option<DateTime<Utc>>,
}

/// Process-local asset store.
///
/// Creation timestamps are strictly increasing so listing order matches insertion order.
#[derive(Default)]
pub struct InMemoryAssetStore {
    inner: RwLock<Inner>,
}

impl InMemoryAssetStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl AssetStore for InMemoryAssetStore {
    #[tracing::instrument(skip(self, asset), fields(db.table = "video_assets", db.operation = "insert", owner_id = %asset.owner_id))]
    async fn insert(&self, asset: NewVideoAsset) -> Result<VideoAsset, AppError> {
        let mut inner = self.inner.write().await;

        let mut created_at = Utc::now();
        if let Some(last) = inner.last_created_at {
            if created_at <= last {
                created_at = last + Duration::microseconds(1);
            }
        }
        inner.last_created_at = Some(created_at);

        let (thumbnail_url, thumbnail_external_id) = match asset.thumbnail {
            Some(thumbnail) => (Some(thumbnail.url), Some(thumbnail.external_id)),
            None => (None, None),
        };

        let record = VideoAsset {
            id: Uuid::new_v4(),
            title: asset.title,
            description: asset.description,
            primary_url: asset.primary_url,
            primary_external_id: asset.primary_external_id,
            thumbnail_url,
            thumbnail_external_id,
            owner_id: asset.owner_id,
            controls: asset.controls,
            transformation: asset.transformation,
            created_at,
            updated_at: created_at,
        };
        inner.assets.insert(record.id, record.clone());

        Ok(record)
    }

    #[tracing::instrument(skip(self), fields(db.table = "video_assets", db.operation = "select", db.record_id = %id))]
    async fn find_by_id(&self, id: Uuid) -> Result<Option<VideoAsset>, AppError> {
        Ok(self.inner.read().await.assets.get(&id).cloned())
    }

    #[tracing::instrument(skip(self), fields(db.table = "video_assets", db.operation = "select"))]
    async fn find_many(&self, query: &AssetQuery) -> Result<Vec<VideoAsset>, AppError> {
        let inner = self.inner.read().await;
        let mut assets: Vec<VideoAsset> = inner
            .assets
            .values()
            .filter(|asset| match &query.owner_id {
                Some(owner_id) => &asset.owner_id == owner_id,
                None => true,
            })
            .cloned()
            .collect();

        assets.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        if let Some(limit) = query.limit {
            assets.truncate(limit as usize);
        }

        Ok(assets)
    }

    #[tracing::instrument(skip(self), fields(db.table = "video_assets", db.operation = "delete", db.record_id = %id))]
    async fn delete_by_id(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.inner.write().await.assets.remove(&id).is_some())
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use vidvault_core::models::{ThumbnailRef, Transformation};

    fn new_asset(owner: &str, title: &str) -> NewVideoAsset {
        NewVideoAsset {
            title: title.to_string(),
            description: String::new(),
            primary_url: format!("v/{}", title),
            primary_external_id: format!("fid-{}", title),
            thumbnail: None,
            owner_id: owner.to_string(),
            controls: true,
            transformation: Transformation::default(),
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_id_and_timestamps() {
        let store = InMemoryAssetStore::new();
        let mut asset = new_asset("u1", "a");
        asset.thumbnail = Some(ThumbnailRef {
            url: "t/a".to_string(),
            external_id: "tid-a".to_string(),
        });

        let saved = store.insert(asset).await.unwrap();
        assert_eq!(saved.created_at, saved.updated_at);
        assert_eq!(saved.thumbnail_external_id.as_deref(), Some("tid-a"));
        assert_eq!(store.find_by_id(saved.id).await.unwrap(), Some(saved));
    }

    #[tokio::test]
    async fn test_find_many_newest_first_and_filtered() {
        let store = InMemoryAssetStore::new();
        let first = store.insert(new_asset("u1", "a")).await.unwrap();
        let second = store.insert(new_asset("u2", "b")).await.unwrap();
        let third = store.insert(new_asset("u1", "c")).await.unwrap();
        assert!(first.created_at < second.created_at);
        assert!(second.created_at < third.created_at);

        let all = store.find_many(&AssetQuery::all()).await.unwrap();
        let ids: Vec<Uuid> = all.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![third.id, second.id, first.id]);

        let mine = store.find_many(&AssetQuery::owned_by("u1")).await.unwrap();
        let ids: Vec<Uuid> = mine.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![third.id, first.id]);

        let limited = store
            .find_many(&AssetQuery::all().with_limit(Some(1)))
            .await
            .unwrap();
        assert_eq!(limited.len(), 1);
        assert_eq!(limited[0].id, third.id);
    }

    #[tokio::test]
    async fn test_delete_reports_absence() {
        let store = InMemoryAssetStore::new();
        let saved = store.insert(new_asset("u1", "a")).await.unwrap();

        assert!(store.delete_by_id(saved.id).await.unwrap());
        assert!(!store.delete_by_id(saved.id).await.unwrap());
        assert!(store.find_by_id(saved.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_concurrent_deletes_single_winner() {
        let store = Arc::new(InMemoryAssetStore::new());
        let saved = store.insert(new_asset("u1", "a")).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move { store.delete_by_id(saved.id).await }));
        }

        let mut winners = 0;
        for handle in handles {
            if handle.await.unwrap().unwrap() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
    }
}
