use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres};
use uuid::Uuid;
use vidvault_core::models::{AssetQuery, NewVideoAsset, Transformation, VideoAsset};
use vidvault_core::AppError;

use super::AssetStore;

const ASSET_COLUMNS: &str = "id, title, description, primary_url, primary_external_id, \
     thumbnail_url, thumbnail_external_id, owner_id, controls, \
     transform_width, transform_height, transform_quality, created_at, updated_at";

/// Row shape of `video_assets`; the transformation is stored as three columns.
#[derive(Debug, FromRow)]
struct VideoAssetRow {
    id: Uuid,
    title: String,
    description: String,
    primary_url: String,
    primary_external_id: String,
    thumbnail_url: Option<String>,
    thumbnail_external_id: Option<String>,
    owner_id: String,
    controls: bool,
    transform_width: i32,
    transform_height: i32,
    transform_quality: i16,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<VideoAssetRow> for VideoAsset {
    type Error = AppError;

    fn try_from(row: VideoAssetRow) -> Result<Self, Self::Error> {
        let id = row.id;
        let out_of_range =
            |column: &str| AppError::Internal(format!("video_assets.{} out of range for {}", column, id));
        let transformation = Transformation {
            width: u32::try_from(row.transform_width).map_err(|_| out_of_range("transform_width"))?,
            height: u32::try_from(row.transform_height)
                .map_err(|_| out_of_range("transform_height"))?,
            quality: u8::try_from(row.transform_quality)
                .map_err(|_| out_of_range("transform_quality"))?,
        };

        Ok(VideoAsset {
            id: row.id,
            title: row.title,
            description: row.description,
            primary_url: row.primary_url,
            primary_external_id: row.primary_external_id,
            thumbnail_url: row.thumbnail_url,
            thumbnail_external_id: row.thumbnail_external_id,
            owner_id: row.owner_id,
            controls: row.controls,
            transformation,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// PostgreSQL-backed asset store
#[derive(Clone)]
pub struct PgAssetStore {
    pool: PgPool,
}

impl PgAssetStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl AssetStore for PgAssetStore {
    #[tracing::instrument(skip(self, asset), fields(db.table = "video_assets", db.operation = "insert", owner_id = %asset.owner_id))]
    async fn insert(&self, asset: NewVideoAsset) -> Result<VideoAsset, AppError> {
        let (thumbnail_url, thumbnail_external_id) = match asset.thumbnail {
            Some(thumbnail) => (Some(thumbnail.url), Some(thumbnail.external_id)),
            None => (None, None),
        };

        let row = sqlx::query_as::<Postgres, VideoAssetRow>(&format!(
            r#"
            INSERT INTO video_assets (
                id, title, description, primary_url, primary_external_id,
                thumbnail_url, thumbnail_external_id, owner_id, controls,
                transform_width, transform_height, transform_quality
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {}
            "#,
            ASSET_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(&asset.title)
        .bind(&asset.description)
        .bind(&asset.primary_url)
        .bind(&asset.primary_external_id)
        .bind(thumbnail_url)
        .bind(thumbnail_external_id)
        .bind(&asset.owner_id)
        .bind(asset.controls)
        .bind(asset.transformation.width as i32)
        .bind(asset.transformation.height as i32)
        .bind(i16::from(asset.transformation.quality))
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    #[tracing::instrument(skip(self), fields(db.table = "video_assets", db.operation = "select", db.record_id = %id))]
    async fn find_by_id(&self, id: Uuid) -> Result<Option<VideoAsset>, AppError> {
        let row = sqlx::query_as::<Postgres, VideoAssetRow>(&format!(
            "SELECT {} FROM video_assets WHERE id = $1",
            ASSET_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(VideoAsset::try_from).transpose()
    }

    #[tracing::instrument(skip(self), fields(db.table = "video_assets", db.operation = "select"))]
    async fn find_many(&self, query: &AssetQuery) -> Result<Vec<VideoAsset>, AppError> {
        // LIMIT NULL is no limit; both filters hit (owner_id, created_at DESC) or (created_at DESC).
        let rows = sqlx::query_as::<Postgres, VideoAssetRow>(&format!(
            r#"
            SELECT {}
            FROM video_assets
            WHERE ($1::text IS NULL OR owner_id = $1)
            ORDER BY created_at DESC, id DESC
            LIMIT $2
            "#,
            ASSET_COLUMNS
        ))
        .bind(query.owner_id.as_deref())
        .bind(query.limit.map(i64::from))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(VideoAsset::try_from).collect()
    }

    #[tracing::instrument(skip(self), fields(db.table = "video_assets", db.operation = "delete", db.record_id = %id))]
    async fn delete_by_id(&self, id: Uuid) -> Result<bool, AppError> {
        let rows_affected = sqlx::query("DELETE FROM video_assets WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(rows_affected > 0)
    }

    #[tracing::instrument(skip(self), fields(db.operation = "ping"))]
    async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> VideoAssetRow {
        let now = Utc::now();
        VideoAssetRow {
            id: Uuid::new_v4(),
            title: "Demo".to_string(),
            description: String::new(),
            primary_url: "v/1".to_string(),
            primary_external_id: "fid1".to_string(),
            thumbnail_url: None,
            thumbnail_external_id: None,
            owner_id: "user-1".to_string(),
            controls: true,
            transform_width: 1080,
            transform_height: 1920,
            transform_quality: 100,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_row_into_asset() {
        let asset = VideoAsset::try_from(row()).unwrap();
        assert_eq!(asset.transformation, Transformation::default());
        assert_eq!(asset.owner_id, "user-1");
    }

    #[test]
    fn test_row_with_corrupt_quality() {
        let mut bad = row();
        bad.transform_quality = 300;
        assert!(matches!(VideoAsset::try_from(bad), Err(AppError::Internal(_))));
    }
}
