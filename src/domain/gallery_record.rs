//! Gallery records: the only durable entity of the site.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::PhotoId;

/// Kind of gallery entry, fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GalleryKind {
    /// One photo.
    Single,
    /// A before/after pair of photos.
    BeforeAfter,
}

impl GalleryKind {
    /// Wire/database discriminator (`"single"` or `"before-after"`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::BeforeAfter => "before-after",
        }
    }

    /// Parses a discriminator, accepting the camelCase spelling the admin
    /// form has used historically.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "single" => Some(Self::Single),
            "before-after" | "beforeAfter" | "before_after" => Some(Self::BeforeAfter),
            _ => None,
        }
    }
}

/// A binary that lives in object storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredImage {
    /// Public URL the browser loads.
    pub url: String,
    /// Opaque handle used to delete the object later.
    pub storage_id: String,
}

/// Type-dependent image payload of a record.
///
/// Being an enum, a record can never hold both a single image and a
/// before/after pair, nor neither.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum GalleryPayload {
    /// One photo.
    Single(StoredImage),
    /// Before/after pair.
    BeforeAfter {
        /// Photo taken before the work.
        before: StoredImage,
        /// Photo taken after the work.
        after: StoredImage,
    },
}

impl GalleryPayload {
    /// Kind matching this payload.
    #[must_use]
    pub const fn kind(&self) -> GalleryKind {
        match self {
            Self::Single(_) => GalleryKind::Single,
            Self::BeforeAfter { .. } => GalleryKind::BeforeAfter,
        }
    }

    /// Every stored object referenced by this payload.
    #[must_use]
    pub fn images(&self) -> Vec<&StoredImage> {
        match self {
            Self::Single(image) => vec![image],
            Self::BeforeAfter { before, after } => vec![before, after],
        }
    }
}

/// One published gallery entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryRecord {
    /// Record identifier.
    pub id: PhotoId,
    /// Optional caption.
    pub description: Option<String>,
    /// Whether the record is shown on the landing page.
    pub is_featured: bool,
    /// Creation timestamp (immutable).
    pub created_at: DateTime<Utc>,
    /// Stored images.
    #[serde(flatten)]
    pub payload: GalleryPayload,
}

impl GalleryRecord {
    /// Kind of the record, derived from its payload.
    #[must_use]
    pub const fn kind(&self) -> GalleryKind {
        self.payload.kind()
    }
}

/// A record about to be inserted; the store assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGalleryRecord {
    /// Optional caption.
    pub description: Option<String>,
    /// Stored images.
    pub payload: GalleryPayload,
}

impl NewGalleryRecord {
    /// Completes the record with its store-assigned identity.
    #[must_use]
    pub fn into_record(self, id: PhotoId, created_at: DateTime<Utc>) -> GalleryRecord {
        GalleryRecord {
            id,
            description: self.description,
            is_featured: false,
            created_at,
            payload: self.payload,
        }
    }
}

/// Filter applied by list operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListFilter {
    /// Every record.
    #[default]
    All,
    /// Only records flagged as featured.
    FeaturedOnly,
}

impl ListFilter {
    /// Returns `true` when `record` passes the filter.
    #[must_use]
    pub const fn matches(self, record: &GalleryRecord) -> bool {
        match self {
            Self::All => true,
            Self::FeaturedOnly => record.is_featured,
        }
    }
}

/// Sorts records newest first (`created_at` desc, then `id` desc).
pub fn sort_newest_first(records: &mut [GalleryRecord]) {
    records.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn image(tag: &str) -> StoredImage {
        StoredImage {
            url: format!("/uploads/{tag}.jpg"),
            storage_id: format!("{tag}.jpg"),
        }
    }

    #[test]
    fn single_record_serializes_flat() {
        let record = NewGalleryRecord {
            description: Some("Kitchen".to_string()),
            payload: GalleryPayload::Single(image("a")),
        }
        .into_record(PhotoId::new(5), Utc::now());

        let Ok(json) = serde_json::to_value(&record) else {
            panic!("serialization failed");
        };
        assert_eq!(json["type"], "single");
        assert_eq!(json["url"], "/uploads/a.jpg");
        assert_eq!(json["storageId"], "a.jpg");
        assert_eq!(json["isFeatured"], false);
        assert!(json.get("before").is_none());
    }

    #[test]
    fn before_after_record_reads_back_from_json() {
        let raw = serde_json::json!({
            "id": 9,
            "description": null,
            "isFeatured": true,
            "createdAt": "2026-01-02T03:04:05Z",
            "type": "before-after",
            "before": {"url": "/uploads/b.jpg", "storageId": "b.jpg"},
            "after": {"url": "/uploads/c.jpg", "storageId": "c.jpg"}
        });
        let Ok(record) = serde_json::from_value::<GalleryRecord>(raw) else {
            panic!("deserialization failed");
        };
        assert_eq!(record.kind(), GalleryKind::BeforeAfter);
        assert_eq!(record.payload.images().len(), 2);
        assert!(record.is_featured);
    }

    #[test]
    fn kind_parse_accepts_known_spellings() {
        assert_eq!(GalleryKind::parse("single"), Some(GalleryKind::Single));
        assert_eq!(GalleryKind::parse("beforeAfter"), Some(GalleryKind::BeforeAfter));
        assert_eq!(GalleryKind::parse("before-after"), Some(GalleryKind::BeforeAfter));
        assert_eq!(GalleryKind::parse("triptych"), None);
    }

    #[test]
    fn newest_first_breaks_ties_by_id() {
        let now = Utc::now();
        let older = now - chrono::Duration::seconds(10);
        let mk = |id, at| {
            NewGalleryRecord {
                description: None,
                payload: GalleryPayload::Single(image("x")),
            }
            .into_record(PhotoId::new(id), at)
        };
        let mut records = vec![mk(1, older), mk(2, now), mk(3, now)];
        sort_newest_first(&mut records);
        let ids: Vec<i64> = records.iter().map(|r| r.id.get()).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn featured_filter() {
        let mut record = NewGalleryRecord {
            description: None,
            payload: GalleryPayload::Single(image("x")),
        }
        .into_record(PhotoId::new(1), Utc::now());
        assert!(ListFilter::All.matches(&record));
        assert!(!ListFilter::FeaturedOnly.matches(&record));
        record.is_featured = true;
        assert!(ListFilter::FeaturedOnly.matches(&record));
    }
}
