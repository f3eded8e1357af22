//! HTTP layer: route handlers, DTOs, OpenAPI document and router
//! composition.

pub mod dto;
pub mod handlers;
pub mod openapi;

use axum::Router;

use crate::app_state::AppState;
use crate::config::SiteConfig;

/// Builds the complete site router: JSON endpoints, admin session routes,
/// the contact relay and the static site.
pub fn build_router(config: &SiteConfig) -> Router<AppState> {
    Router::new()
        .merge(handlers::gallery::routes(config.upload_max_bytes))
        .merge(handlers::admin::routes())
        .merge(handlers::contact::routes())
        .merge(handlers::system::routes())
        .merge(handlers::pages::routes(&config.public_dir, &config.storage))
}
