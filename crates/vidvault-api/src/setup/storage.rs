//! Blob store setup

use anyhow::Result;
use std::sync::Arc;
use vidvault_core::Config;
use vidvault_storage::{create_blob_store, BlobStore};

pub async fn setup_storage(config: &Config) -> Result<Arc<dyn BlobStore>> {
    let blobs = create_blob_store(config)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create blob store: {}", e))?;

    tracing::info!(backend = %blobs.backend_type(), "Blob store initialized");
    Ok(blobs)
}
