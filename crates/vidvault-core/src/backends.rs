use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Blob hosting backend types
///
/// Defined in core because configuration selects the backend and the
/// storage crate reports which one it is talking to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlobBackend {
    /// ImageKit-compatible hosted media API
    Hosted,
    S3,
    Local,
}

impl FromStr for BlobBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hosted" | "imagekit" => Ok(BlobBackend::Hosted),
            "s3" => Ok(BlobBackend::S3),
            "local" => Ok(BlobBackend::Local),
            _ => Err(anyhow::anyhow!("Invalid blob backend: {}", s)),
        }
    }
}

impl Display for BlobBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            BlobBackend::Hosted => write!(f, "hosted"),
            BlobBackend::S3 => write!(f, "s3"),
            BlobBackend::Local => write!(f, "local"),
        }
    }
}

/// Metadata store backend types
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetadataBackend {
    Postgres,
    /// Process-local store; contents are lost on restart
    Memory,
}

impl FromStr for MetadataBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(MetadataBackend::Postgres),
            "memory" => Ok(MetadataBackend::Memory),
            _ => Err(anyhow::anyhow!("Invalid metadata backend: {}", s)),
        }
    }
}

impl Display for MetadataBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            MetadataBackend::Postgres => write!(f, "postgres"),
            MetadataBackend::Memory => write!(f, "memory"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blob_backend_parse() {
        assert_eq!("HOSTED".parse::<BlobBackend>().unwrap(), BlobBackend::Hosted);
        assert_eq!("imagekit".parse::<BlobBackend>().unwrap(), BlobBackend::Hosted);
        assert_eq!("s3".parse::<BlobBackend>().unwrap(), BlobBackend::S3);
        assert!("nfs".parse::<BlobBackend>().is_err());
    }

    #[test]
    fn test_metadata_backend_roundtrip_display() {
        for backend in [MetadataBackend::Postgres, MetadataBackend::Memory] {
            assert_eq!(backend.to_string().parse::<MetadataBackend>().unwrap(), backend);
        }
    }
}
