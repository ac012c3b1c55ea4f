pub mod asset_query;
pub mod principal;
pub mod video_asset;

pub use asset_query::{AssetListFilter, AssetQuery, MAX_LIST_LIMIT};
pub use principal::Principal;
pub use video_asset::{
    BlobRole, CreateVideoAssetRequest, NewVideoAsset, ThumbnailRef, Transformation,
    TransformationRequest, VideoAsset, DEFAULT_QUALITY, TARGET_HEIGHT, TARGET_WIDTH,
};
