//! Vidvault Metadata Store
//!
//! Durable storage for video asset records. `PgAssetStore` is the production
//! implementation; `InMemoryAssetStore` backs development runs and tests.

pub mod db;

pub use db::{create_asset_store, AssetStore, InMemoryAssetStore, PgAssetStore};
