//! Domain layer: gallery records, upload validation, contact messages.
//!
//! Everything here is free of I/O; the persistence, storage and mail
//! layers consume these types.

pub mod contact;
pub mod gallery_record;
pub mod photo_id;
pub mod upload;

pub use contact::ContactMessage;
pub use gallery_record::{
    GalleryKind, GalleryPayload, GalleryRecord, ListFilter, NewGalleryRecord, StoredImage,
    sort_newest_first,
};
pub use photo_id::PhotoId;
pub use upload::{ImageUpload, UploadImages, UploadPlan, UploadRequest};
