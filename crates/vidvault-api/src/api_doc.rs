//! OpenAPI documentation, served at `/api/openapi.json` and browsable at `/docs`.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use vidvault_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Vidvault API",
        version = "0.1.0",
        description = "Video asset catalog. Asset payloads live with a blob hosting service; this API keeps their metadata and removes both on delete."
    ),
    paths(
        handlers::assets::list_assets,
        handlers::assets::create_asset,
        handlers::assets::delete_asset,
        handlers::upload_auth::upload_auth,
    ),
    components(
        schemas(
            models::VideoAsset,
            models::Transformation,
            models::CreateVideoAssetRequest,
            models::TransformationRequest,
            models::AssetListFilter,
            handlers::assets::DeleteAssetResponse,
            handlers::upload_auth::UploadAuthResponse,
            error::ErrorResponse,
            vidvault_core::FieldViolation,
        )
    ),
    tags(
        (name = "assets", description = "Video asset lifecycle"),
        (name = "uploads", description = "Direct-to-host upload signing")
    )
)]
pub struct ApiDoc;
