//! Vidvault Core Library
//!
//! Domain models, error types and configuration shared by the vidvault crates.

pub mod backends;
pub mod config;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use backends::{BlobBackend, MetadataBackend};
pub use config::{AssetServiceConfig, BaseConfig, Config};
pub use error::{AppError, ErrorMetadata, FieldViolation, LogLevel, ValidationFailures};
