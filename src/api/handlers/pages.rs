//! Static site pages and locally stored uploads.

use std::path::Path;

use axum::Router;
use axum::routing::get_service;
use tower_http::services::{ServeDir, ServeFile};

use crate::app_state::AppState;
use crate::config::StorageConfig;

/// Serves the public site.
///
/// `/realisations` maps to `realisations.html`, everything else unmatched
/// falls back to files under `public_dir` (`index.html` at `/`). When images
/// are kept on local disk under a path prefix, that prefix serves them.
pub fn routes(public_dir: &Path, storage: &StorageConfig) -> Router<AppState> {
    let mut router = Router::new().route(
        "/realisations",
        get_service(ServeFile::new(public_dir.join("realisations.html"))),
    );

    if let StorageConfig::Local { dir, url_prefix } = storage {
        if url_prefix.starts_with('/') && url_prefix.len() > 1 {
            router = router.nest_service(url_prefix, ServeDir::new(dir));
        } else {
            tracing::warn!(
                %url_prefix,
                "uploads URL prefix is not a local path, uploads are not served by this process"
            );
        }
    }

    router.fallback_service(ServeDir::new(public_dir))
}
