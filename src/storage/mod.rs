//! Object storage for uploaded images.
//!
//! [`ObjectStorage`] writes a binary and hands back a durable URL plus an
//! opaque storage id; the id is all that is needed to delete the object
//! later.

pub mod cloudinary;
pub mod local;

use std::fmt;

use async_trait::async_trait;

use crate::domain::{ImageUpload, StoredImage};
use crate::error::SiteError;

pub use cloudinary::CloudinaryStorage;
pub use local::LocalDiskStorage;

/// Backend that keeps uploaded image binaries.
#[async_trait]
pub trait ObjectStorage: fmt::Debug + Send + Sync {
    /// Stores `image` and returns where it can be fetched from.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Storage`] when the backend rejects or fails the
    /// write.
    async fn put(&self, image: &ImageUpload) -> Result<StoredImage, SiteError>;

    /// Deletes the object with the given storage id. Deleting an object
    /// that no longer exists succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Storage`] when the backend fails the deletion.
    async fn delete(&self, storage_id: &str) -> Result<(), SiteError>;
}
