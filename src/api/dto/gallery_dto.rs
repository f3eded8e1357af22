//! Gallery DTOs for listing, uploading, featuring and deleting records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{GalleryPayload, GalleryRecord, ListFilter, PhotoId, StoredImage};

/// Stored image as exposed to the browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoredImageDto {
    /// Public URL of the image.
    pub url: String,
    /// Storage handle.
    pub storage_id: String,
}

impl From<StoredImage> for StoredImageDto {
    fn from(image: StoredImage) -> Self {
        Self {
            url: image.url,
            storage_id: image.storage_id,
        }
    }
}

/// Gallery record on the wire.
///
/// `single` records carry `url` and `storageId`; `before-after` records
/// carry `before` and `after`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GalleryRecordDto {
    /// Record identifier.
    #[schema(value_type = i64)]
    pub id: PhotoId,
    /// `single` or `before-after`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Optional caption.
    pub description: Option<String>,
    /// Whether the record is shown on the landing page.
    pub is_featured: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Image URL (`single` only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Image storage handle (`single` only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_id: Option<String>,
    /// Photo before the work (`before-after` only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<StoredImageDto>,
    /// Photo after the work (`before-after` only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<StoredImageDto>,
}

impl From<GalleryRecord> for GalleryRecordDto {
    fn from(record: GalleryRecord) -> Self {
        let kind = record.kind().as_str().to_string();
        let (url, storage_id, before, after) = match record.payload {
            GalleryPayload::Single(image) => (Some(image.url), Some(image.storage_id), None, None),
            GalleryPayload::BeforeAfter { before, after } => {
                (None, None, Some(before.into()), Some(after.into()))
            }
        };
        Self {
            id: record.id,
            kind,
            description: record.description,
            is_featured: record.is_featured,
            created_at: record.created_at,
            url,
            storage_id,
            before,
            after,
        }
    }
}

/// Query parameters for `GET /api/photos`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PhotoListParams {
    /// Only featured records are returned when this is `true`; any other
    /// value lists everything.
    #[serde(default)]
    pub featured: Option<String>,
}

impl PhotoListParams {
    /// Converts the query into a list filter.
    #[must_use]
    pub fn filter(&self) -> ListFilter {
        if self.featured.as_deref().map(str::trim) == Some("true") {
            ListFilter::FeaturedOnly
        } else {
            ListFilter::All
        }
    }
}

/// Request body for `POST /api/photos/{id}/feature`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeatureRequest {
    /// New value of the featured flag.
    pub is_featured: bool,
}

/// Response body for `POST /api/delete/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeleteResponse {
    /// Always `true`.
    pub success: bool,
    /// Identifier of the deleted record.
    #[schema(value_type = i64)]
    pub id: PhotoId,
}

/// Multipart form accepted by `POST /api/upload` (documentation only).
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadForm {
    /// `single` or `before-after`; inferred from the files when omitted.
    pub upload_type: Option<String>,
    /// Optional caption.
    pub description: Option<String>,
    /// Image for a `single` record.
    #[schema(value_type = Option<String>, format = Binary)]
    pub photo: Option<Vec<u8>>,
    /// "Before" image (alias `photo_avant`).
    #[serde(rename = "photo_before")]
    #[schema(value_type = Option<String>, format = Binary)]
    pub photo_before: Option<Vec<u8>>,
    /// "After" image (alias `photo_apres`).
    #[serde(rename = "photo_after")]
    #[schema(value_type = Option<String>, format = Binary)]
    pub photo_after: Option<Vec<u8>>,
}
