//! Asset lifecycle: create, list and delete video assets.
//!
//! Metadata and blobs live in two systems with no shared transaction. Metadata
//! is authoritative: a delete always removes the record once the caller is
//! authorized, and blob removal is best effort. A failed blob delete leaves an
//! orphan in the hosting service, reported through [`BlobFailureHook`].

use futures::future::join_all;
use std::sync::Arc;
use uuid::Uuid;
use vidvault_core::models::{
    AssetListFilter, AssetQuery, BlobRole, CreateVideoAssetRequest, Principal, VideoAsset,
};
use vidvault_core::AppError;
use vidvault_db::AssetStore;
use vidvault_storage::{BlobFailure, BlobOutcome, BlobStore};

use crate::auth::require_session;

/// Receives every blob delete that did not succeed.
pub trait BlobFailureHook: Send + Sync {
    fn on_blob_failure(&self, asset: &VideoAsset, failure: &BlobDeleteFailure);
}

/// Logs orphaned blobs at warn level.
pub struct TracingBlobFailureHook;

impl BlobFailureHook for TracingBlobFailureHook {
    fn on_blob_failure(&self, asset: &VideoAsset, failure: &BlobDeleteFailure) {
        tracing::warn!(
            asset_id = %asset.id,
            owner_id = %asset.owner_id,
            role = %failure.role,
            external_id = %failure.external_id,
            kind = %failure.failure.kind,
            reason = %failure.failure.reason,
            "Blob delete failed; remote file may be orphaned"
        );
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobDeleteFailure {
    pub role: BlobRole,
    pub external_id: String,
    pub failure: BlobFailure,
}

/// What a successful delete did to the blob store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteReport {
    pub asset_id: Uuid,
    pub blobs_attempted: usize,
    pub blob_failures: Vec<BlobDeleteFailure>,
}

impl DeleteReport {
    /// True when every blob was removed.
    pub fn is_clean(&self) -> bool {
        self.blob_failures.is_empty()
    }
}

#[derive(Clone)]
pub struct AssetLifecycleService {
    store: Arc<dyn AssetStore>,
    blobs: Arc<dyn BlobStore>,
    blob_failure_hook: Arc<dyn BlobFailureHook>,
}

impl AssetLifecycleService {
    pub fn new(store: Arc<dyn AssetStore>, blobs: Arc<dyn BlobStore>) -> Self {
        Self {
            store,
            blobs,
            blob_failure_hook: Arc::new(TracingBlobFailureHook),
        }
    }

    pub fn with_blob_failure_hook(mut self, hook: Arc<dyn BlobFailureHook>) -> Self {
        self.blob_failure_hook = hook;
        self
    }

    /// List assets, newest first. `mine` restricts to the caller's assets and needs a session.
    #[tracing::instrument(skip(self, principal))]
    pub async fn list_assets(
        &self,
        filter: &AssetListFilter,
        principal: Option<&Principal>,
    ) -> Result<Vec<VideoAsset>, AppError> {
        let query = if filter.mine {
            let principal = require_session(principal.cloned())?;
            AssetQuery::owned_by(principal.id)
        } else {
            AssetQuery::all()
        };

        self.store.find_many(&query.with_limit(filter.limit)).await
    }

    /// Validate and persist a new asset owned by the caller.
    #[tracing::instrument(skip(self, principal, payload))]
    pub async fn create_asset(
        &self,
        principal: Option<&Principal>,
        payload: CreateVideoAssetRequest,
    ) -> Result<VideoAsset, AppError> {
        let principal = require_session(principal.cloned())?;
        let new_asset = payload.into_new_asset(&principal)?;

        let asset = self.store.insert(new_asset).await?;
        tracing::info!(asset_id = %asset.id, owner_id = %asset.owner_id, "Asset created");
        Ok(asset)
    }

    /// Delete an asset owned by the caller.
    ///
    /// Order: session, lookup, ownership, blob deletes, metadata delete. Nothing is
    /// touched unless the caller owns the asset. Blob failures are reported, never
    /// raised. If another request removed the record first, this one gets `NotFound`.
    #[tracing::instrument(skip(self, principal))]
    pub async fn delete_asset(
        &self,
        principal: Option<&Principal>,
        asset_id: Uuid,
    ) -> Result<DeleteReport, AppError> {
        let principal = require_session(principal.cloned())?;

        let asset = self
            .store
            .find_by_id(asset_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Asset not found".to_string()))?;

        if !asset.is_owned_by(&principal) {
            return Err(AppError::Forbidden("Forbidden".to_string()));
        }

        let references = asset.blob_references();
        let blobs_attempted = references.len();
        let outcomes = join_all(references.iter().map(|(role, external_id)| {
            let blobs = self.blobs.clone();
            async move { (*role, *external_id, blobs.delete_object(external_id).await) }
        }))
        .await;

        let mut blob_failures = Vec::new();
        for (role, external_id, outcome) in outcomes {
            if let BlobOutcome::Failed(failure) = outcome {
                let failure = BlobDeleteFailure {
                    role,
                    external_id: external_id.to_string(),
                    failure,
                };
                self.blob_failure_hook.on_blob_failure(&asset, &failure);
                blob_failures.push(failure);
            }
        }

        if !self.store.delete_by_id(asset_id).await? {
            return Err(AppError::NotFound("Asset not found".to_string()));
        }

        tracing::info!(
            asset_id = %asset_id,
            blobs_attempted,
            blob_failures = blob_failures.len(),
            "Asset deleted"
        );

        Ok(DeleteReport {
            asset_id,
            blobs_attempted,
            blob_failures,
        })
    }
}
