//! Service layer: business logic orchestration.
//!
//! [`GalleryService`] coordinates record persistence and object storage
//! for the gallery lifecycle.

pub mod gallery_service;

pub use gallery_service::GalleryService;
