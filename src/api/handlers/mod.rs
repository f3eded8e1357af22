//! REST endpoint handlers organized by resource.

pub mod admin;
pub mod contact;
pub mod gallery;
pub mod pages;
pub mod system;
