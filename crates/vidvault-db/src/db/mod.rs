//! Asset store trait and implementations
//
// Trait shared by every backend
pub mod asset_store;
//
// Process-local store
pub mod memory;
//
// PostgreSQL store
pub mod postgres;

pub use asset_store::{create_asset_store, AssetStore};
pub use memory::InMemoryAssetStore;
pub use postgres::PgAssetStore;
