//! Vidvault Blob Store Client
//!
//! Removes asset payloads from the blob hosting service. Every delete is
//! classified into a [`BlobOutcome`]; nothing here returns an error into the
//! caller's control flow.
//!
//! # External ids
//!
//! An external id is whatever the backend uses to address a stored file:
//! the hosting service's file id, an S3 object key, or a path relative to the
//! local storage root. Keys must not contain `..` or a leading `/`.

pub mod factory;
#[cfg(feature = "hosted")]
pub mod hosted;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_blob_store;
#[cfg(feature = "hosted")]
pub use hosted::{sign_upload_token, HostedBlobStore};
#[cfg(feature = "storage-local")]
pub use local::LocalBlobStore;
#[cfg(feature = "storage-s3")]
pub use s3::S3BlobStore;
pub use traits::{
    BlobFailure, BlobFailureKind, BlobOutcome, BlobStore, BlobStoreError, BlobStoreResult,
    UploadCredentials,
};
pub use vidvault_core::BlobBackend;
