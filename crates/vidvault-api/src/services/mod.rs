pub mod asset_lifecycle;

pub use asset_lifecycle::{
    AssetLifecycleService, BlobDeleteFailure, BlobFailureHook, DeleteReport,
    TracingBlobFailureHook,
};
