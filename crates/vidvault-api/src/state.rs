//! Application state shared by every handler.

use crate::auth::PrincipalResolver;
use crate::services::AssetLifecycleService;
use std::sync::Arc;
use std::time::Duration;
use vidvault_db::AssetStore;
use vidvault_storage::BlobStore;

#[derive(Clone)]
pub struct AppState {
    pub lifecycle: AssetLifecycleService,
    pub store: Arc<dyn AssetStore>,
    pub blobs: Arc<dyn BlobStore>,
    pub resolver: Arc<dyn PrincipalResolver>,
    /// Lifetime of signatures issued by `/upload-auth`
    pub upload_token_ttl: Duration,
}

impl AppState {
    pub fn new(
        store: Arc<dyn AssetStore>,
        blobs: Arc<dyn BlobStore>,
        resolver: Arc<dyn PrincipalResolver>,
        upload_token_ttl: Duration,
    ) -> Self {
        Self {
            lifecycle: AssetLifecycleService::new(store.clone(), blobs.clone()),
            store,
            blobs,
            resolver,
            upload_token_ttl,
        }
    }
}
