//! Application setup and initialization
//!
//! Everything main.rs needs to turn a `Config` into a running router.

pub mod database;
pub mod routes;
pub mod server;
pub mod storage;
pub mod validation;

use crate::auth::{PrincipalResolver, SessionTokenResolver};
use crate::state::AppState;
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use vidvault_core::Config;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    validation::validate_config(&config).context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(config.environment())
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!("Configuration loaded and validated successfully");

    let store = database::setup_asset_store(&config).await?;
    let blobs = storage::setup_storage(&config).await?;

    let resolver: Arc<dyn PrincipalResolver> = Arc::new(SessionTokenResolver::new(
        config.session_secret(),
        config.session_cookie_name(),
    ));

    let state = Arc::new(AppState::new(
        store,
        blobs,
        resolver,
        Duration::from_secs(config.upload_token_ttl_secs()),
    ));

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
