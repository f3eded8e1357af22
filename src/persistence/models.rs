//! Database row model for the `gallery_items` table.

use chrono::{DateTime, Utc};

use crate::domain::{GalleryKind, GalleryPayload, GalleryRecord, PhotoId, StoredImage};
use crate::error::SiteError;

/// A stored row from the `gallery_items` table.
///
/// The payload columns are nullable; which ones are populated depends on
/// `item_type`. The table's CHECK constraint enforces the same rule as
/// [`GalleryRow::into_record`].
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GalleryRow {
    /// `BIGSERIAL` row id.
    pub id: i64,
    /// `"single"` or `"before-after"`.
    pub item_type: String,
    /// Optional caption.
    pub description: Option<String>,
    /// Featured flag.
    pub is_featured: bool,
    /// Server-side creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Single image URL.
    pub image_url: Option<String>,
    /// Single image storage id.
    pub image_storage_id: Option<String>,
    /// "Before" image URL.
    pub before_url: Option<String>,
    /// "Before" image storage id.
    pub before_storage_id: Option<String>,
    /// "After" image URL.
    pub after_url: Option<String>,
    /// "After" image storage id.
    pub after_storage_id: Option<String>,
}

/// Nullable columns of a payload as bound into an `INSERT`.
#[derive(Debug, Default)]
pub struct PayloadColumns<'a> {
    /// `image_url`.
    pub image_url: Option<&'a str>,
    /// `image_storage_id`.
    pub image_storage_id: Option<&'a str>,
    /// `before_url`.
    pub before_url: Option<&'a str>,
    /// `before_storage_id`.
    pub before_storage_id: Option<&'a str>,
    /// `after_url`.
    pub after_url: Option<&'a str>,
    /// `after_storage_id`.
    pub after_storage_id: Option<&'a str>,
}

impl<'a> From<&'a GalleryPayload> for PayloadColumns<'a> {
    fn from(payload: &'a GalleryPayload) -> Self {
        match payload {
            GalleryPayload::Single(image) => Self {
                image_url: Some(&image.url),
                image_storage_id: Some(&image.storage_id),
                ..Self::default()
            },
            GalleryPayload::BeforeAfter { before, after } => Self {
                before_url: Some(&before.url),
                before_storage_id: Some(&before.storage_id),
                after_url: Some(&after.url),
                after_storage_id: Some(&after.storage_id),
                ..Self::default()
            },
        }
    }
}

fn image(url: Option<String>, storage_id: Option<String>) -> Option<StoredImage> {
    Some(StoredImage {
        url: url?,
        storage_id: storage_id?,
    })
}

impl GalleryRow {
    /// Converts the row into a domain record.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Internal`] when the row's type is unknown or its
    /// payload columns do not match the type.
    pub fn into_record(self) -> Result<GalleryRecord, SiteError> {
        let id = PhotoId::new(self.id);
        let kind = GalleryKind::parse(&self.item_type).ok_or_else(|| {
            SiteError::Internal(format!("row {id} has unknown type {}", self.item_type))
        })?;

        let single = image(self.image_url, self.image_storage_id);
        let before = image(self.before_url, self.before_storage_id);
        let after = image(self.after_url, self.after_storage_id);

        let payload = match (kind, single, before, after) {
            (GalleryKind::Single, Some(image), None, None) => GalleryPayload::Single(image),
            (GalleryKind::BeforeAfter, None, Some(before), Some(after)) => {
                GalleryPayload::BeforeAfter { before, after }
            }
            _ => {
                return Err(SiteError::Internal(format!(
                    "row {id} payload does not match type {}",
                    kind.as_str()
                )));
            }
        };

        Ok(GalleryRecord {
            id,
            description: self.description,
            is_featured: self.is_featured,
            created_at: self.created_at,
            payload,
        })
    }
}
