//! Persistence layer: gallery record stores.
//!
//! Provides the [`GalleryRepository`] trait for durable storage of gallery
//! records, with three implementations:
//!
//! - [`postgres::PostgresGalleryRepository`]: `sqlx::PgPool`, the
//!   production backend.
//! - [`json_file::JsonFileGalleryRepository`]: a single JSON array file,
//!   every read-modify-write serialized behind an async mutex.
//! - [`memory::MemoryGalleryRepository`]: process-local, for development
//!   and tests.

pub mod json_file;
pub mod memory;
pub mod models;
pub mod postgres;

use std::fmt;

use async_trait::async_trait;

use crate::domain::{GalleryRecord, ListFilter, NewGalleryRecord, PhotoId};
use crate::error::SiteError;

pub use json_file::JsonFileGalleryRepository;
pub use memory::MemoryGalleryRepository;
pub use postgres::PostgresGalleryRepository;

/// Durable store of gallery records.
///
/// Implementations assign `id` and `created_at` on insert and return
/// records newest first from [`GalleryRepository::list`].
#[async_trait]
pub trait GalleryRepository: fmt::Debug + Send + Sync {
    /// Lists records matching `filter`, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::StoreUnavailable`] when the store cannot be read.
    async fn list(&self, filter: ListFilter) -> Result<Vec<GalleryRecord>, SiteError>;

    /// Inserts a record and returns it with its assigned identity.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::StoreUnavailable`] when the store cannot be
    /// written.
    async fn insert(&self, record: NewGalleryRecord) -> Result<GalleryRecord, SiteError>;

    /// Removes a record, returning it.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::PhotoNotFound`] if no record has this id, or
    /// [`SiteError::StoreUnavailable`] on store failure.
    async fn remove(&self, id: PhotoId) -> Result<GalleryRecord, SiteError>;

    /// Sets the featured flag of a record, returning the updated record.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::PhotoNotFound`] if no record has this id, or
    /// [`SiteError::StoreUnavailable`] on store failure.
    async fn set_featured(&self, id: PhotoId, featured: bool)
    -> Result<GalleryRecord, SiteError>;
}
