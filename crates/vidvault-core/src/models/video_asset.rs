use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::principal::Principal;
use crate::error::{FieldViolation, ValidationFailures};

/// Target playback width applied when the payload does not supply one.
pub const TARGET_WIDTH: u32 = 1080;
/// Target playback height applied when the payload does not supply one.
pub const TARGET_HEIGHT: u32 = 1920;
pub const DEFAULT_QUALITY: u8 = 100;

/// Playback transformation stored with every asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Transformation {
    pub width: u32,
    pub height: u32,
    /// Encoding quality in [1, 100]
    pub quality: u8,
}

impl Default for Transformation {
    fn default() -> Self {
        Self {
            width: TARGET_WIDTH,
            height: TARGET_HEIGHT,
            quality: DEFAULT_QUALITY,
        }
    }
}

/// A user-uploaded video and its optional thumbnail, as persisted in the metadata store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VideoAsset {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub primary_url: String,
    pub primary_external_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_external_id: Option<String>,
    pub owner_id: String,
    pub controls: bool,
    pub transformation: Transformation,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VideoAsset {
    pub fn is_owned_by(&self, principal: &Principal) -> bool {
        self.owner_id == principal.id
    }

    /// External blob ids to remove when this asset is deleted, primary first.
    pub fn blob_references(&self) -> Vec<(BlobRole, &str)> {
        let mut refs = vec![(BlobRole::Primary, self.primary_external_id.as_str())];
        if let Some(thumbnail) = self.thumbnail_external_id.as_deref() {
            refs.push((BlobRole::Thumbnail, thumbnail));
        }
        refs
    }
}

/// Which of an asset's blobs an external id refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BlobRole {
    Primary,
    Thumbnail,
}

impl Display for BlobRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            BlobRole::Primary => write!(f, "primary"),
            BlobRole::Thumbnail => write!(f, "thumbnail"),
        }
    }
}

/// Fully validated construction record handed to the metadata store.
///
/// Only `CreateVideoAssetRequest::into_new_asset` builds one, so every instance
/// has a non-empty title and primary reference and a complete thumbnail pair or none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVideoAsset {
    pub title: String,
    pub description: String,
    pub primary_url: String,
    pub primary_external_id: String,
    pub thumbnail: Option<ThumbnailRef>,
    pub owner_id: String,
    pub controls: bool,
    pub transformation: Transformation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailRef {
    pub url: String,
    pub external_id: String,
}

/// Requested transformation; unspecified values fall back to the defaults.
#[derive(Debug, Clone, Default, Deserialize, ToSchema, Validate)]
pub struct TransformationRequest {
    #[validate(range(min = 1, max = 7680, message = "must be between 1 and 7680"))]
    pub width: Option<i64>,
    #[validate(range(min = 1, max = 7680, message = "must be between 1 and 7680"))]
    pub height: Option<i64>,
    #[validate(range(min = 1, max = 100, message = "must be between 1 and 100"))]
    pub quality: Option<i64>,
}

/// Create payload as sent by the upload client.
///
/// Presence of the required fields is checked in `into_new_asset` rather than by serde,
/// so a missing field is reported alongside every other problem instead of as a parse error.
/// `ownerId`/`userId` are not part of the schema; unknown keys are ignored.
#[derive(Debug, Clone, Default, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateVideoAssetRequest {
    #[serde(default)]
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    pub title: Option<String>,
    #[serde(default)]
    #[validate(length(max = 5000, message = "must be at most 5000 characters"))]
    pub description: Option<String>,
    #[serde(default, alias = "videoUrl")]
    #[validate(length(max = 2048, message = "must be at most 2048 characters"))]
    pub primary_url: Option<String>,
    #[serde(default, alias = "videoFileId")]
    #[validate(length(max = 512, message = "must be at most 512 characters"))]
    pub primary_external_id: Option<String>,
    #[serde(default)]
    #[validate(length(max = 2048, message = "must be at most 2048 characters"))]
    pub thumbnail_url: Option<String>,
    #[serde(default, alias = "thumbnailFileId")]
    #[validate(length(max = 512, message = "must be at most 512 characters"))]
    pub thumbnail_external_id: Option<String>,
    #[serde(default)]
    pub controls: Option<bool>,
    #[serde(default)]
    pub transformation: Option<TransformationRequest>,
}

impl CreateVideoAssetRequest {
    /// Validate the payload and build the record to persist for `owner`.
    ///
    /// Collects every violation before returning. A thumbnail locator without its
    /// external id (or the reverse) is rejected on the missing half.
    pub fn into_new_asset(self, owner: &Principal) -> Result<NewVideoAsset, ValidationFailures> {
        let mut failures = ValidationFailures::new();

        if let Err(errors) = self.validate() {
            collect_validator_errors(&errors, "", &mut failures);
        }
        if let Some(transformation) = &self.transformation {
            if let Err(errors) = transformation.validate() {
                collect_validator_errors(&errors, "transformation.", &mut failures);
            }
        }

        let title = required(&self.title, "title", &mut failures);
        let primary_url = required(&self.primary_url, "primaryUrl", &mut failures);
        let primary_external_id =
            required(&self.primary_external_id, "primaryExternalId", &mut failures);

        let thumbnail_url = present(&self.thumbnail_url);
        let thumbnail_external_id = present(&self.thumbnail_external_id);
        let thumbnail = match (thumbnail_url, thumbnail_external_id) {
            (Some(url), Some(external_id)) => Some(ThumbnailRef {
                url: url.to_string(),
                external_id: external_id.to_string(),
            }),
            (Some(_), None) => {
                failures.push(FieldViolation::new(
                    "thumbnailExternalId",
                    "is required when thumbnailUrl is set",
                ));
                None
            }
            (None, Some(_)) => {
                failures.push(FieldViolation::new(
                    "thumbnailUrl",
                    "is required when thumbnailExternalId is set",
                ));
                None
            }
            (None, None) => None,
        };

        failures.into_result()?;

        let requested = self.transformation.unwrap_or_default();
        let defaults = Transformation::default();
        // Ranges were checked above, so the narrowing casts cannot truncate.
        let transformation = Transformation {
            width: requested.width.map_or(defaults.width, |w| w as u32),
            height: requested.height.map_or(defaults.height, |h| h as u32),
            quality: requested.quality.map_or(defaults.quality, |q| q as u8),
        };

        Ok(NewVideoAsset {
            title: title.unwrap_or_default(),
            description: self
                .description
                .map(|d| d.trim().to_string())
                .unwrap_or_default(),
            primary_url: primary_url.unwrap_or_default(),
            primary_external_id: primary_external_id.unwrap_or_default(),
            thumbnail,
            owner_id: owner.id.clone(),
            controls: self.controls.unwrap_or(true),
            transformation,
        })
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn required(value: &Option<String>, field: &str, failures: &mut ValidationFailures) -> Option<String> {
    match present(value) {
        Some(v) => Some(v.to_string()),
        None => {
            failures.push(FieldViolation::new(field, "is required"));
            None
        }
    }
}

fn collect_validator_errors(
    errors: &validator::ValidationErrors,
    prefix: &str,
    failures: &mut ValidationFailures,
) {
    let mut collected: Vec<FieldViolation> = Vec::new();
    for (field, field_errors) in errors.field_errors() {
        for error in field_errors.iter() {
            let message = error
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| error.code.to_string());
            collected.push(FieldViolation::new(
                format!("{}{}", prefix, to_camel_case(&field)),
                message,
            ));
        }
    }
    collected.sort_by(|a, b| a.field.cmp(&b.field));
    for violation in collected {
        failures.push(violation);
    }
}

fn to_camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper_next = false;
    for c in field.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner() -> Principal {
        Principal::new("user-1")
    }

    fn demo_request() -> CreateVideoAssetRequest {
        CreateVideoAssetRequest {
            title: Some("Demo".to_string()),
            primary_url: Some("v/1".to_string()),
            primary_external_id: Some("fid1".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults_applied() {
        let asset = demo_request().into_new_asset(&owner()).unwrap();
        assert_eq!(asset.owner_id, "user-1");
        assert!(asset.controls);
        assert_eq!(asset.description, "");
        assert_eq!(
            asset.transformation,
            Transformation {
                width: 1080,
                height: 1920,
                quality: 100
            }
        );
        assert!(asset.thumbnail.is_none());
    }

    #[test]
    fn test_missing_required_fields_reported_together() {
        let request = CreateVideoAssetRequest {
            title: Some("   ".to_string()),
            ..Default::default()
        };
        let failures = request.into_new_asset(&owner()).unwrap_err();
        assert!(failures.contains_field("title"));
        assert!(failures.contains_field("primaryUrl"));
        assert!(failures.contains_field("primaryExternalId"));
        assert_eq!(failures.violations().len(), 3);
    }

    #[test]
    fn test_half_thumbnail_pair_rejected() {
        let mut request = demo_request();
        request.thumbnail_url = Some("t/1".to_string());
        let failures = request.into_new_asset(&owner()).unwrap_err();
        assert!(failures.contains_field("thumbnailExternalId"));

        let mut request = demo_request();
        request.thumbnail_external_id = Some("tid1".to_string());
        let failures = request.into_new_asset(&owner()).unwrap_err();
        assert!(failures.contains_field("thumbnailUrl"));
    }

    #[test]
    fn test_full_thumbnail_pair_kept() {
        let mut request = demo_request();
        request.thumbnail_url = Some("t/1".to_string());
        request.thumbnail_external_id = Some("tid1".to_string());
        let asset = request.into_new_asset(&owner()).unwrap();
        assert_eq!(
            asset.thumbnail,
            Some(ThumbnailRef {
                url: "t/1".to_string(),
                external_id: "tid1".to_string()
            })
        );
    }

    #[test]
    fn test_quality_out_of_range() {
        let mut request = demo_request();
        request.transformation = Some(TransformationRequest {
            quality: Some(0),
            ..Default::default()
        });
        let failures = request.into_new_asset(&owner()).unwrap_err();
        assert!(failures.contains_field("transformation.quality"));
    }

    #[test]
    fn test_explicit_transformation_and_controls() {
        let mut request = demo_request();
        request.controls = Some(false);
        request.transformation = Some(TransformationRequest {
            width: Some(720),
            height: None,
            quality: Some(80),
        });
        let asset = request.into_new_asset(&owner()).unwrap();
        assert!(!asset.controls);
        assert_eq!(asset.transformation.width, 720);
        assert_eq!(asset.transformation.height, TARGET_HEIGHT);
        assert_eq!(asset.transformation.quality, 80);
    }

    #[test]
    fn test_owner_comes_from_principal_not_payload() {
        let json = r#"{"title":"Demo","primaryUrl":"v/1","primaryExternalId":"fid1","ownerId":"mallory","userId":"mallory"}"#;
        let request: CreateVideoAssetRequest = serde_json::from_str(json).unwrap();
        let asset = request.into_new_asset(&owner()).unwrap();
        assert_eq!(asset.owner_id, "user-1");
    }

    #[test]
    fn test_legacy_aliases_accepted() {
        let json = r#"{"title":"Demo","videoUrl":"v/1","videoFileId":"fid1","thumbnailUrl":"t/1","thumbnailFileId":"tid1"}"#;
        let request: CreateVideoAssetRequest = serde_json::from_str(json).unwrap();
        let asset = request.into_new_asset(&owner()).unwrap();
        assert_eq!(asset.primary_external_id, "fid1");
        assert_eq!(asset.thumbnail.unwrap().external_id, "tid1");
    }

    #[test]
    fn test_title_too_long() {
        let mut request = demo_request();
        request.title = Some("x".repeat(201));
        let failures = request.into_new_asset(&owner()).unwrap_err();
        assert!(failures.contains_field("title"));
    }

    #[test]
    fn test_blob_references_order() {
        let now = Utc::now();
        let asset = VideoAsset {
            id: Uuid::new_v4(),
            title: "Demo".to_string(),
            description: String::new(),
            primary_url: "v/1".to_string(),
            primary_external_id: "fid1".to_string(),
            thumbnail_url: Some("t/1".to_string()),
            thumbnail_external_id: Some("tid1".to_string()),
            owner_id: "user-1".to_string(),
            controls: true,
            transformation: Transformation::default(),
            created_at: now,
            updated_at: now,
        };
        assert_eq!(
            asset.blob_references(),
            vec![(BlobRole::Primary, "fid1"), (BlobRole::Thumbnail, "tid1")]
        );
        assert!(asset.is_owned_by(&owner()));
        assert!(!asset.is_owned_by(&Principal::new("user-2")));
    }

    #[test]
    fn test_asset_serializes_camel_case() {
        let now = Utc::now();
        let asset = VideoAsset {
            id: Uuid::nil(),
            title: "Demo".to_string(),
            description: String::new(),
            primary_url: "v/1".to_string(),
            primary_external_id: "fid1".to_string(),
            thumbnail_url: None,
            thumbnail_external_id: None,
            owner_id: "user-1".to_string(),
            controls: true,
            transformation: Transformation::default(),
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(&asset).unwrap();
        assert_eq!(json["ownerId"], "user-1");
        assert_eq!(json["primaryExternalId"], "fid1");
        assert_eq!(json["transformation"]["quality"], 100);
        assert!(json.get("thumbnailUrl").is_none());
        assert!(json.get("createdAt").is_some());
    }
}
