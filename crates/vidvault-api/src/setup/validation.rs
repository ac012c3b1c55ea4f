//! Configuration validation
//!
//! Validates critical configuration values at startup to catch misconfigurations early.

use anyhow::Result;
use vidvault_core::{BlobBackend, Config};

/// Validate critical configuration values
///
/// Runs the per-field checks in `Config::validate`, then the cross-cutting ones
/// that only matter once the server is about to start.
pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    if config.db_max_connections() == 0 {
        return Err(anyhow::anyhow!("Database max connections cannot be 0"));
    }

    if config.db_timeout_seconds() == 0 {
        return Err(anyhow::anyhow!("Database timeout cannot be 0"));
    }

    if config.max_body_bytes() == 0 {
        return Err(anyhow::anyhow!("MAX_BODY_BYTES cannot be 0"));
    }

    if config.blob_backend() != BlobBackend::Hosted {
        tracing::info!(
            backend = %config.blob_backend(),
            "Blob backend cannot sign client uploads; /upload-auth will answer 501"
        );
    }

    Ok(())
}
