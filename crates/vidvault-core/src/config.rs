//! Configuration module
//!
//! Runtime settings for the asset service: HTTP server, metadata store,
//! session verification and the blob hosting backend.

use std::collections::HashMap;
use std::env;

use crate::backends::{BlobBackend, MetadataBackend};

// Common constants
const SERVER_PORT: u16 = 4000;
const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const MAX_BODY_BYTES: usize = 1024 * 1024;
const SESSION_COOKIE_NAME: &str = "session-token";
const MIN_SESSION_SECRET_CHARS: usize = 32;
const BLOB_API_URL: &str = "https://api.imagekit.io/v1";
const BLOB_REQUEST_TIMEOUT_SECS: u64 = 10;
const UPLOAD_TOKEN_TTL_SECS: u64 = 1800;
/// The hosting service refuses upload signatures that expire more than an hour out.
pub const MAX_UPLOAD_TOKEN_TTL_SECS: u64 = 3600;

/// Server-level settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    pub max_body_bytes: usize,
}

/// Asset service configuration
#[derive(Clone, Debug)]
pub struct AssetServiceConfig {
    pub base: BaseConfig,
    // Metadata store
    pub metadata_backend: MetadataBackend,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    // Session verification (tokens issued by the identity provider)
    pub session_secret: String,
    pub session_cookie_name: String,
    // Blob hosting
    pub blob_backend: BlobBackend,
    pub blob_api_url: String,
    pub blob_public_key: Option<String>,
    pub blob_private_key: Option<String>,
    pub blob_request_timeout_secs: u64,
    pub upload_token_ttl_secs: u64,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // MinIO and other S3-compatible providers
    pub local_storage_path: Option<String>,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<AssetServiceConfig>);

impl Config {
    fn inner(&self) -> &AssetServiceConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_env(&self.inner().base.environment)
    }

    /// Load from the process environment (and `.env` when present).
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load from an explicit key/value map.
    pub fn from_map(vars: &HashMap<String, String>) -> Result<Self, anyhow::Error> {
        Self::from_lookup(|key| vars.get(key).cloned())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, anyhow::Error> {
        let config = AssetServiceConfig::from_lookup(lookup)?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.inner().validate()
    }

    // Convenience getters for common fields
    pub fn server_port(&self) -> u16 {
        self.inner().base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.inner().base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.inner().base.environment
    }

    pub fn max_body_bytes(&self) -> usize {
        self.inner().base.max_body_bytes
    }

    pub fn metadata_backend(&self) -> MetadataBackend {
        self.inner().metadata_backend
    }

    pub fn database_url(&self) -> Option<&str> {
        self.inner().database_url.as_deref()
    }

    pub fn db_max_connections(&self) -> u32 {
        self.inner().db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.inner().db_timeout_seconds
    }

    pub fn session_secret(&self) -> &str {
        &self.inner().session_secret
    }

    pub fn session_cookie_name(&self) -> &str {
        &self.inner().session_cookie_name
    }

    pub fn blob_backend(&self) -> BlobBackend {
        self.inner().blob_backend
    }

    pub fn blob_api_url(&self) -> &str {
        &self.inner().blob_api_url
    }

    pub fn blob_public_key(&self) -> Option<&str> {
        self.inner().blob_public_key.as_deref()
    }

    pub fn blob_private_key(&self) -> Option<&str> {
        self.inner().blob_private_key.as_deref()
    }

    pub fn blob_request_timeout_secs(&self) -> u64 {
        self.inner().blob_request_timeout_secs
    }

    pub fn upload_token_ttl_secs(&self) -> u64 {
        self.inner().upload_token_ttl_secs
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.inner().s3_bucket.as_deref()
    }

    pub fn s3_region(&self) -> Option<&str> {
        self.inner().s3_region.as_deref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.inner().s3_endpoint.as_deref()
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.inner().local_storage_path.as_deref()
    }
}

fn is_production_env(environment: &str) -> bool {
    let environment = environment.to_lowercase();
    environment == "production" || environment == "prod"
}

impl AssetServiceConfig {
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, anyhow::Error> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let environment = var("ENVIRONMENT")
            .or_else(|| var("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let cors_origins_str = var("CORS_ORIGINS").unwrap_or_else(|| "*".to_string());
        if is_production_env(&environment) && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let base = BaseConfig {
            server_port: var("PORT")
                .unwrap_or_else(|| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            environment,
            max_body_bytes: var("MAX_BODY_BYTES")
                .and_then(|s| s.parse().ok())
                .unwrap_or(MAX_BODY_BYTES),
        };

        let metadata_backend = match var("METADATA_BACKEND") {
            Some(s) => s.parse::<MetadataBackend>()?,
            None => MetadataBackend::Postgres,
        };

        let blob_backend = match var("BLOB_BACKEND") {
            Some(s) => s.parse::<BlobBackend>()?,
            None => BlobBackend::Hosted,
        };

        let upload_token_ttl_secs = var("UPLOAD_TOKEN_TTL_SECS")
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(UPLOAD_TOKEN_TTL_SECS)
            .clamp(1, MAX_UPLOAD_TOKEN_TTL_SECS);

        let config = AssetServiceConfig {
            base,
            metadata_backend,
            database_url: var("DATABASE_URL"),
            db_max_connections: var("DB_MAX_CONNECTIONS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: var("DB_TIMEOUT_SECONDS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            session_secret: var("SESSION_SECRET").ok_or_else(|| {
                anyhow::anyhow!("SESSION_SECRET must be set to verify session tokens")
            })?,
            session_cookie_name: var("SESSION_COOKIE_NAME")
                .unwrap_or_else(|| SESSION_COOKIE_NAME.to_string()),
            blob_backend,
            blob_api_url: var("BLOB_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| BLOB_API_URL.to_string()),
            blob_public_key: var("BLOB_PUBLIC_KEY"),
            blob_private_key: var("BLOB_PRIVATE_KEY"),
            blob_request_timeout_secs: var("BLOB_REQUEST_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(BLOB_REQUEST_TIMEOUT_SECS),
            upload_token_ttl_secs,
            s3_bucket: var("S3_BUCKET"),
            s3_region: var("S3_REGION").or_else(|| var("AWS_REGION")),
            s3_endpoint: var("S3_ENDPOINT"),
            local_storage_path: var("LOCAL_STORAGE_PATH"),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.session_secret.len() < MIN_SESSION_SECRET_CHARS {
            return Err(anyhow::anyhow!(
                "SESSION_SECRET must be at least {} characters long",
                MIN_SESSION_SECRET_CHARS
            ));
        }

        if self.metadata_backend == MetadataBackend::Postgres {
            match self.database_url.as_deref() {
                Some(url) if url.starts_with("postgres://") || url.starts_with("postgresql://") => {}
                Some(_) => {
                    return Err(anyhow::anyhow!(
                        "DATABASE_URL must be a valid PostgreSQL connection string"
                    ))
                }
                None => {
                    return Err(anyhow::anyhow!(
                        "DATABASE_URL must be set when METADATA_BACKEND=postgres"
                    ))
                }
            }
        }

        match self.blob_backend {
            BlobBackend::Hosted => {
                if self.blob_private_key.is_none() {
                    return Err(anyhow::anyhow!(
                        "BLOB_PRIVATE_KEY must be set when using the hosted blob backend"
                    ));
                }
                if self.blob_public_key.is_none() {
                    return Err(anyhow::anyhow!(
                        "BLOB_PUBLIC_KEY must be set when using the hosted blob backend"
                    ));
                }
                if !self.blob_api_url.starts_with("http://")
                    && !self.blob_api_url.starts_with("https://")
                {
                    return Err(anyhow::anyhow!("BLOB_API_URL must be an http(s) URL"));
                }
            }
            BlobBackend::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when using S3 blob backend"
                    ));
                }
                if self.s3_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using S3 blob backend"
                    ));
                }
            }
            BlobBackend::Local => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local blob backend"
                    ));
                }
            }
        }

        if self.blob_request_timeout_secs == 0 {
            return Err(anyhow::anyhow!("BLOB_REQUEST_TIMEOUT_SECS must be greater than 0"));
        }

        Ok(())
    }
}
