//! Blob store abstraction
//!
//! This module defines the `BlobStore` trait that all blob backends implement,
//! along with the outcome type every delete is classified into.

use async_trait::async_trait;
use serde::Serialize;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::time::Duration;
use thiserror::Error;
use vidvault_core::BlobBackend;

/// Errors raised while constructing a backend or issuing upload credentials.
///
/// Deletes never produce one of these; see [`BlobOutcome`].
#[derive(Debug, Error)]
pub enum BlobStoreError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid external id: {0}")]
    InvalidKey(String),

    #[error("Operation not supported by the {0} blob backend")]
    Unsupported(BlobBackend),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for blob store setup operations
pub type BlobStoreResult<T> = Result<T, BlobStoreError>;

/// Why a remote delete did not succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlobFailureKind {
    /// The service has no such file
    NotFound,
    /// Credentials were refused
    Unauthorized,
    /// Timeouts, connection errors, throttling and 5xx responses
    Transient,
    /// The service rejected the request for any other reason
    Rejected,
    /// The client could not even build the request
    Misconfigured,
}

impl Display for BlobFailureKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let name = match self {
            BlobFailureKind::NotFound => "not_found",
            BlobFailureKind::Unauthorized => "unauthorized",
            BlobFailureKind::Transient => "transient",
            BlobFailureKind::Rejected => "rejected",
            BlobFailureKind::Misconfigured => "misconfigured",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlobFailure {
    pub kind: BlobFailureKind,
    pub reason: String,
}

impl BlobFailure {
    pub fn new(kind: BlobFailureKind, reason: impl Into<String>) -> Self {
        Self {
            kind,
            reason: reason.into(),
        }
    }
}

/// Result of a single remote delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlobOutcome {
    Ok,
    Failed(BlobFailure),
}

impl BlobOutcome {
    pub fn failed(kind: BlobFailureKind, reason: impl Into<String>) -> Self {
        BlobOutcome::Failed(BlobFailure::new(kind, reason))
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, BlobOutcome::Ok)
    }

    pub fn failure(&self) -> Option<&BlobFailure> {
        match self {
            BlobOutcome::Ok => None,
            BlobOutcome::Failed(failure) => Some(failure),
        }
    }
}

/// Signed parameters a browser needs to upload straight to the hosting service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadCredentials {
    pub token: String,
    /// Unix timestamp (seconds) after which the signature is refused
    pub expire: i64,
    pub signature: String,
    pub public_key: String,
}

/// Blob store abstraction
///
/// Implementations classify every failure into a [`BlobOutcome`]. There is no retry;
/// callers decide what a failed delete means for them.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Delete one stored file by its external id.
    async fn delete_object(&self, external_id: &str) -> BlobOutcome;

    /// Get the blob backend type
    fn backend_type(&self) -> BlobBackend;

    /// Issue credentials for a direct client upload valid for `ttl`.
    ///
    /// Only the hosted backend can do this.
    fn upload_credentials(&self, _ttl: Duration) -> BlobStoreResult<UploadCredentials> {
        Err(BlobStoreError::Unsupported(self.backend_type()))
    }
}

/// Shared external-id check for path-addressed backends.
pub(crate) fn validate_key(external_id: &str) -> BlobStoreResult<()> {
    if external_id.trim().is_empty() {
        return Err(BlobStoreError::InvalidKey("external id is empty".to_string()));
    }
    if external_id.contains("..") || external_id.starts_with('/') || external_id.contains('\\') {
        return Err(BlobStoreError::InvalidKey(
            "external id contains invalid characters".to_string(),
        ));
    }
    Ok(())
}
