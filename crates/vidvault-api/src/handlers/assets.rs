use crate::auth::MaybePrincipal;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson, ValidatedQuery};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;
use vidvault_core::models::{AssetListFilter, CreateVideoAssetRequest, VideoAsset, MAX_LIST_LIMIT};
use vidvault_core::{AppError, FieldViolation, ValidationFailures};

#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteAssetResponse {
    pub message: String,
}

fn check_limit(limit: Option<u32>) -> Result<(), AppError> {
    match limit {
        Some(n) if n == 0 || n > MAX_LIST_LIMIT => {
            let mut failures = ValidationFailures::new();
            failures.push(FieldViolation::new(
                "limit",
                format!("must be between 1 and {}", MAX_LIST_LIMIT),
            ));
            Err(failures.into())
        }
        _ => Ok(()),
    }
}

fn parse_asset_id(raw: &str) -> Result<Uuid, AppError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(AppError::BadRequest("Missing asset id".to_string()));
    }
    Uuid::parse_str(raw).map_err(|_| AppError::BadRequest("Invalid asset id".to_string()))
}

#[utoipa::path(
    get,
    path = "/assets",
    tag = "assets",
    params(AssetListFilter),
    responses(
        (status = 200, description = "Assets, newest first", body = Vec<VideoAsset>),
        (status = 400, description = "limit outside 1-500", body = ErrorResponse),
        (status = 401, description = "mine=true without a session", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, principal), fields(operation = "list_assets"))]
pub async fn list_assets(
    State(state): State<Arc<AppState>>,
    MaybePrincipal(principal): MaybePrincipal,
    ValidatedQuery(filter): ValidatedQuery<AssetListFilter>,
) -> Result<impl IntoResponse, HttpAppError> {
    check_limit(filter.limit)?;

    let assets = state
        .lifecycle
        .list_assets(&filter, principal.as_ref())
        .await?;

    Ok(Json(assets))
}

#[utoipa::path(
    post,
    path = "/assets",
    tag = "assets",
    request_body = CreateVideoAssetRequest,
    responses(
        (status = 200, description = "Asset created", body = VideoAsset),
        (status = 400, description = "Missing or invalid fields", body = ErrorResponse),
        (status = 401, description = "No session", body = ErrorResponse),
        (status = 413, description = "Body over the configured limit", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, principal, payload), fields(operation = "create_asset"))]
pub async fn create_asset(
    State(state): State<Arc<AppState>>,
    MaybePrincipal(principal): MaybePrincipal,
    payload: Result<ValidatedJson<CreateVideoAssetRequest>, HttpAppError>,
) -> Result<impl IntoResponse, HttpAppError> {
    // Anonymous callers learn nothing about the payload rules.
    if principal.is_none() {
        return Err(AppError::Unauthenticated("Unauthorized".to_string()).into());
    }
    let ValidatedJson(payload) = payload?;

    let asset = state
        .lifecycle
        .create_asset(principal.as_ref(), payload)
        .await?;

    Ok(Json(asset))
}

#[utoipa::path(
    delete,
    path = "/assets/{id}",
    tag = "assets",
    params(
        ("id" = Uuid, Path, description = "Asset ID")
    ),
    responses(
        (status = 200, description = "Asset deleted", body = DeleteAssetResponse),
        (status = 400, description = "Missing or malformed id", body = ErrorResponse),
        (status = 401, description = "No session", body = ErrorResponse),
        (status = 403, description = "Caller does not own the asset", body = ErrorResponse),
        (status = 404, description = "Asset not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, principal), fields(operation = "delete_asset"))]
pub async fn delete_asset(
    State(state): State<Arc<AppState>>,
    MaybePrincipal(principal): MaybePrincipal,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let asset_id = parse_asset_id(&id)?;

    let report = state
        .lifecycle
        .delete_asset(principal.as_ref(), asset_id)
        .await?;

    if !report.is_clean() {
        tracing::debug!(
            asset_id = %report.asset_id,
            orphaned = report.blob_failures.len(),
            "Asset deleted with orphaned blobs"
        );
    }

    Ok(Json(DeleteAssetResponse {
        message: "Deleted".to_string(),
    }))
}

/// `DELETE /assets` with no id in the path.
pub async fn delete_asset_without_id() -> HttpAppError {
    AppError::BadRequest("Missing asset id".to_string()).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use vidvault_core::ErrorMetadata;

    #[test]
    fn test_check_limit_bounds() {
        assert!(check_limit(None).is_ok());
        assert!(check_limit(Some(1)).is_ok());
        assert!(check_limit(Some(MAX_LIST_LIMIT)).is_ok());

        let err = check_limit(Some(0)).unwrap_err();
        assert_eq!(err.http_status_code(), 400);
        assert_eq!(err.field_violations().unwrap()[0].field, "limit");
        assert!(check_limit(Some(MAX_LIST_LIMIT + 1)).is_err());
    }

    #[test]
    fn test_parse_asset_id() {
        let id = Uuid::new_v4();
        assert_eq!(parse_asset_id(&id.to_string()).unwrap(), id);

        let err = parse_asset_id("   ").unwrap_err();
        assert_eq!(err.client_message(), "Missing asset id");

        let err = parse_asset_id("not-a-uuid").unwrap_err();
        assert_eq!(err.http_status_code(), 400);
        assert_eq!(err.client_message(), "Invalid asset id");
    }
}
