use crate::traits::{
    BlobFailureKind, BlobOutcome, BlobStore, BlobStoreError, BlobStoreResult, UploadCredentials,
};
use crate::BlobBackend;
use async_trait::async_trait;
use hmac::{Hmac, Mac};
use reqwest::StatusCode;
use sha1::Sha1;
use std::time::Duration;

type HmacSha1 = Hmac<Sha1>;

const MAX_REASON_CHARS: usize = 200;

/// Client for an ImageKit-compatible media hosting API
#[derive(Clone)]
pub struct HostedBlobStore {
    client: reqwest::Client,
    api_base: String,
    public_key: String,
    private_key: String,
}

impl HostedBlobStore {
    /// Create a new HostedBlobStore instance
    ///
    /// # Arguments
    /// * `api_base` - API root, e.g. "https://api.imagekit.io/v1"
    /// * `public_key` - Key handed to browsers alongside upload signatures
    /// * `private_key` - Secret used for basic auth and for signing uploads
    /// * `timeout` - Per-request timeout
    pub fn new(
        api_base: impl Into<String>,
        public_key: impl Into<String>,
        private_key: impl Into<String>,
        timeout: Duration,
    ) -> BlobStoreResult<Self> {
        let private_key = private_key.into();
        if private_key.is_empty() {
            return Err(BlobStoreError::ConfigError(
                "hosted blob backend requires a private key".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BlobStoreError::ConfigError(e.to_string()))?;

        Ok(Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            public_key: public_key.into(),
            private_key,
        })
    }

    fn file_url(&self, external_id: &str) -> String {
        format!("{}/files/{}", self.api_base, urlencoding::encode(external_id))
    }
}

/// Map a non-success HTTP status to a failure kind.
fn classify_status(status: StatusCode) -> BlobFailureKind {
    match status {
        StatusCode::NOT_FOUND => BlobFailureKind::NotFound,
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => BlobFailureKind::Unauthorized,
        StatusCode::TOO_MANY_REQUESTS | StatusCode::REQUEST_TIMEOUT => BlobFailureKind::Transient,
        s if s.is_server_error() => BlobFailureKind::Transient,
        _ => BlobFailureKind::Rejected,
    }
}

fn classify_transport_error(err: &reqwest::Error) -> BlobFailureKind {
    if err.is_builder() {
        BlobFailureKind::Misconfigured
    } else {
        BlobFailureKind::Transient
    }
}

/// `hex(HMAC-SHA1(private_key, token || expire))`, the signature the hosting
/// service expects on client uploads.
pub fn sign_upload_token(private_key: &str, token: &str, expire: i64) -> String {
    let mut mac =
        HmacSha1::new_from_slice(private_key.as_bytes()).expect("HMAC accepts any key size");
    mac.update(token.as_bytes());
    mac.update(expire.to_string().as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

#[async_trait]
impl BlobStore for HostedBlobStore {
    async fn delete_object(&self, external_id: &str) -> BlobOutcome {
        if external_id.trim().is_empty() {
            return BlobOutcome::failed(BlobFailureKind::Rejected, "external id is empty");
        }

        let start = std::time::Instant::now();
        let response = self
            .client
            .delete(self.file_url(external_id))
            .basic_auth(&self.private_key, None::<&str>)
            .send()
            .await;

        let response = match response {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!(
                    error = %e,
                    external_id = %external_id,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Hosted delete request failed"
                );
                return BlobOutcome::failed(classify_transport_error(&e), e.to_string());
            }
        };

        let status = response.status();
        if status.is_success() {
            tracing::info!(
                external_id = %external_id,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Hosted delete successful"
            );
            return BlobOutcome::Ok;
        }

        let body = response.text().await.unwrap_or_default();
        let mut reason = format!("HTTP {}", status.as_u16());
        let body = body.trim();
        if !body.is_empty() {
            reason.push_str(": ");
            reason.extend(body.chars().take(MAX_REASON_CHARS));
        }

        BlobOutcome::failed(classify_status(status), reason)
    }

    fn backend_type(&self) -> BlobBackend {
        BlobBackend::Hosted
    }

    fn upload_credentials(&self, ttl: Duration) -> BlobStoreResult<UploadCredentials> {
        let token = hex::encode(rand::random::<[u8; 16]>());
        let ttl_secs = i64::try_from(ttl.as_secs()).map_err(|_| {
            BlobStoreError::ConfigError("upload token ttl out of range".to_string())
        })?;
        let expire = chrono::Utc::now().timestamp() + ttl_secs;
        let signature = sign_upload_token(&self.private_key, &token, expire);

        Ok(UploadCredentials {
            token,
            expire,
            signature,
            public_key: self.public_key.clone(),
        })
    }
}
