//! Vidvault API Library
//!
//! HTTP handlers, session resolution, the asset lifecycle service and application setup.

mod api_doc;
mod handlers;
mod telemetry;

pub mod auth;
pub mod error;
pub mod services;
pub mod setup;
pub mod state;

pub use error::ErrorResponse;
pub use services::{AssetLifecycleService, BlobFailureHook, DeleteReport};
pub use state::AppState;
