//! Upload requests and their validation.
//!
//! The HTTP layer collects multipart fields into an [`UploadRequest`];
//! [`UploadRequest::into_plan`] checks that the files match the declared
//! kind before anything touches object storage.

use axum::body::Bytes;

use super::GalleryKind;
use crate::error::SiteError;

/// File-name extensions accepted when the browser sent no content type.
const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "webp", "avif", "heic", "bmp", "tif", "tiff",
];

fn is_plain_extension(ext: &str) -> bool {
    !ext.is_empty() && ext.len() <= 5 && ext.chars().all(|c| c.is_ascii_alphanumeric())
}

/// One image file received from the admin form.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// Client-side file name, if the browser sent one.
    pub file_name: Option<String>,
    /// Declared MIME type (e.g. `image/jpeg`).
    pub content_type: Option<String>,
    /// Raw file contents.
    pub bytes: Bytes,
}

impl ImageUpload {
    /// Returns the lowercase file extension to store the object under.
    ///
    /// A declared `image/*` content type decides the extension; the client
    /// file name is only consulted when no content type was sent, and then
    /// only for known image extensions.
    #[must_use]
    pub fn extension(&self) -> Option<String> {
        if let Some(subtype) = self
            .content_type
            .as_deref()
            .and_then(|ct| ct.split(';').next())
            .map(|ct| ct.trim().to_ascii_lowercase())
            .and_then(|ct| ct.strip_prefix("image/").map(str::to_string))
        {
            return match subtype.as_str() {
                "jpeg" | "jpg" | "pjpeg" => Some("jpg".to_string()),
                other if is_plain_extension(other) => Some(other.to_string()),
                _ => None,
            };
        }

        self.file_name
            .as_deref()
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .filter(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
    }

    fn check(&self, slot: &str) -> Result<(), SiteError> {
        if self.bytes.is_empty() {
            return Err(SiteError::Validation(format!("{slot} file is empty")));
        }
        if let Some(content_type) = self.content_type.as_deref()
            && !content_type.starts_with("image/")
        {
            return Err(SiteError::Validation(format!(
                "{slot} must be an image, got {content_type}"
            )));
        }
        Ok(())
    }
}

/// Raw upload as collected from the form, not yet validated.
#[derive(Debug, Clone, Default)]
pub struct UploadRequest {
    /// Declared kind (`uploadType` field), if any.
    pub upload_type: Option<String>,
    /// Caption entered by the admin.
    pub description: Option<String>,
    /// File for a single upload.
    pub photo: Option<ImageUpload>,
    /// "Before" file for a before/after upload.
    pub photo_before: Option<ImageUpload>,
    /// "After" file for a before/after upload.
    pub photo_after: Option<ImageUpload>,
}

/// Validated files, shaped by kind.
#[derive(Debug, Clone)]
pub enum UploadImages {
    /// One photo.
    Single(ImageUpload),
    /// Before/after pair.
    BeforeAfter {
        /// Photo taken before the work.
        before: ImageUpload,
        /// Photo taken after the work.
        after: ImageUpload,
    },
}

/// A validated upload ready to be written to storage.
#[derive(Debug, Clone)]
pub struct UploadPlan {
    /// Caption, trimmed; blank captions are dropped.
    pub description: Option<String>,
    /// Files to store.
    pub images: UploadImages,
}

impl UploadPlan {
    /// Kind of the record this plan creates.
    #[must_use]
    pub const fn kind(&self) -> GalleryKind {
        match self.images {
            UploadImages::Single(_) => GalleryKind::Single,
            UploadImages::BeforeAfter { .. } => GalleryKind::BeforeAfter,
        }
    }
}

impl UploadRequest {
    /// Validates the request against its declared kind.
    ///
    /// When `upload_type` is absent the kind is inferred from the files
    /// present.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Validation`] for an unknown kind, missing files,
    /// files that do not belong to the declared kind, or non-image files.
    pub fn into_plan(self) -> Result<UploadPlan, SiteError> {
        let kind = match self.upload_type.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => GalleryKind::parse(raw)
                .ok_or_else(|| SiteError::Validation(format!("unknown upload type: {raw}")))?,
            _ => self.inferred_kind()?,
        };

        let description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        let images = match kind {
            GalleryKind::Single => {
                if self.photo_before.is_some() || self.photo_after.is_some() {
                    return Err(SiteError::Validation(
                        "a single upload must not carry before/after files".to_string(),
                    ));
                }
                let photo = self.photo.ok_or_else(|| {
                    SiteError::Validation("a single upload needs a photo file".to_string())
                })?;
                photo.check("photo")?;
                UploadImages::Single(photo)
            }
            GalleryKind::BeforeAfter => {
                if self.photo.is_some() {
                    return Err(SiteError::Validation(
                        "a before-after upload must not carry a single photo".to_string(),
                    ));
                }
                let (Some(before), Some(after)) = (self.photo_before, self.photo_after) else {
                    return Err(SiteError::Validation(
                        "a before-after upload needs both a before and an after file".to_string(),
                    ));
                };
                before.check("before photo")?;
                after.check("after photo")?;
                UploadImages::BeforeAfter { before, after }
            }
        };

        Ok(UploadPlan {
            description,
            images,
        })
    }

    fn inferred_kind(&self) -> Result<GalleryKind, SiteError> {
        match (
            self.photo.is_some(),
            self.photo_before.is_some() || self.photo_after.is_some(),
        ) {
            (true, false) => Ok(GalleryKind::Single),
            (false, true) => Ok(GalleryKind::BeforeAfter),
            (false, false) => Err(SiteError::Validation("no file uploaded".to_string())),
            (true, true) => Err(SiteError::Validation(
                "upload mixes a single photo with before/after files".to_string(),
            )),
        }
    }
}
