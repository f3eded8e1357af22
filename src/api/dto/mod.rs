//! Data Transfer Objects for REST request/response serialization.
//!
//! JSON field names are camelCase to match the site's front-end scripts.

pub mod admin_dto;
pub mod contact_dto;
pub mod gallery_dto;

pub use admin_dto::*;
pub use contact_dto::*;
pub use gallery_dto::*;
