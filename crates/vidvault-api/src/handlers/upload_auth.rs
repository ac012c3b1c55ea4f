use crate::auth::{require_session, MaybePrincipal};
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use vidvault_core::AppError;
use vidvault_storage::{BlobStoreError, UploadCredentials};

/// Parameters a browser passes to the hosting service's upload endpoint.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadAuthResponse {
    pub token: String,
    /// Unix timestamp (seconds)
    pub expire: i64,
    pub signature: String,
    pub public_key: String,
}

impl From<UploadCredentials> for UploadAuthResponse {
    fn from(credentials: UploadCredentials) -> Self {
        Self {
            token: credentials.token,
            expire: credentials.expire,
            signature: credentials.signature,
            public_key: credentials.public_key,
        }
    }
}

#[utoipa::path(
    get,
    path = "/upload-auth",
    tag = "uploads",
    responses(
        (status = 200, description = "Signed upload parameters", body = UploadAuthResponse),
        (status = 401, description = "No session", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
        (status = 501, description = "Blob backend cannot issue upload credentials", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, principal), fields(operation = "upload_auth"))]
pub async fn upload_auth(
    State(state): State<Arc<AppState>>,
    MaybePrincipal(principal): MaybePrincipal,
) -> Result<impl IntoResponse, HttpAppError> {
    let principal = require_session(principal)?;

    let credentials = state
        .blobs
        .upload_credentials(state.upload_token_ttl)
        .map_err(|e| match e {
            BlobStoreError::Unsupported(backend) => AppError::NotImplemented(format!(
                "Upload credentials are not available for the {} blob backend",
                backend
            )),
            other => AppError::Internal(other.to_string()),
        })?;

    tracing::debug!(
        principal_id = %principal.id,
        expire = credentials.expire,
        "Issued upload credentials"
    );

    Ok(Json(UploadAuthResponse::from(credentials)))
}
