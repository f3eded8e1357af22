//! # vitrine
//!
//! Backend for a small business marketing site: a public photo gallery
//! managed by a single admin, and a contact form relayed over SMTP.
//!
//! ## Architecture
//!
//! ```text
//! Browser (public pages, admin page)
//!     │
//!     ├── Handlers (api/)  ── AdminSession extractor (auth/)
//!     │
//!     ├── GalleryService (service/)     Mailer (mail/)
//!     │        │            │                │
//!     │  GalleryRepository  ObjectStorage    SMTP relay
//!     │  (persistence/)     (storage/)
//!     │        │            │
//!     └── PostgreSQL / JSON file / memory    local disk / Cloudinary
//! ```
//!
//! Uploads are validated before any image is stored; a record is inserted
//! only once its images are in object storage. Deletes remove the record
//! first and clean up the images on a best-effort basis.

pub mod api;
pub mod app_state;
pub mod auth;
pub mod config;
pub mod domain;
pub mod error;
pub mod mail;
pub mod persistence;
pub mod service;
pub mod storage;
