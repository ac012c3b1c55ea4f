//! Test helpers: build AppState and router for integration tests.
//!
//! The app runs against the in-memory metadata store and a scripted blob store,
//! so no database or network is needed.

#![allow(dead_code)]

pub mod auth;
pub mod blobs;

use axum_test::TestServer;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use vidvault_api::auth::{PrincipalResolver, SessionTokenResolver};
use vidvault_api::setup::routes;
use vidvault_api::state::AppState;
use vidvault_core::Config;
use vidvault_db::InMemoryAssetStore;
use vidvault_storage::BlobStore;

pub use blobs::ScriptedBlobStore;

pub const TEST_UPLOAD_TTL_SECS: u64 = 1800;

/// Test application: server plus handles on its stores.
pub struct TestApp {
    pub server: TestServer,
    pub store: Arc<InMemoryAssetStore>,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

pub fn create_test_config() -> Config {
    let vars: HashMap<String, String> = [
        ("SESSION_SECRET", auth::TEST_SESSION_SECRET),
        ("METADATA_BACKEND", "memory"),
        ("BLOB_BACKEND", "local"),
        ("LOCAL_STORAGE_PATH", "/tmp/vidvault-test-blobs"),
        ("MAX_BODY_BYTES", "65536"),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    Config::from_map(&vars).expect("Failed to build test config")
}

/// Setup a test app whose blob deletes all succeed.
pub fn setup_test_app() -> TestApp {
    setup_test_app_with_blobs(Arc::new(ScriptedBlobStore::new()))
}

/// Setup a test app around the given blob store.
pub fn setup_test_app_with_blobs(blobs: Arc<dyn BlobStore>) -> TestApp {
    let config = create_test_config();
    let store = Arc::new(InMemoryAssetStore::new());

    let resolver: Arc<dyn PrincipalResolver> = Arc::new(SessionTokenResolver::new(
        config.session_secret(),
        config.session_cookie_name(),
    ));
    let state = Arc::new(AppState::new(
        store.clone(),
        blobs,
        resolver,
        Duration::from_secs(TEST_UPLOAD_TTL_SECS),
    ));

    let app = routes::setup_routes(&config, state).expect("Failed to build routes");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp { server, store }
}

/// Minimal valid create payload for `title`.
pub fn demo_payload(title: &str) -> serde_json::Value {
    serde_json::json!({
        "title": title,
        "primaryUrl": format!("v/{}", title),
        "primaryExternalId": format!("fid-{}", title),
    })
}
