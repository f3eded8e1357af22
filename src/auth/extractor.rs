//! Axum extractor guarding admin-only routes.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::CookieJar;

use super::gate::{AdminPrincipal, SESSION_COOKIE};
use crate::app_state::AppState;
use crate::error::SiteError;

/// Proof that the request carries a live admin session.
///
/// Declared before any body extractor in a handler's arguments, it rejects
/// anonymous requests with [`SiteError::Unauthorized`] before the body is
/// read or validated.
#[derive(Debug, Clone, Copy)]
pub struct AdminSession(pub AdminPrincipal);

impl FromRequestParts<AppState> for AdminSession {
    type Rejection = SiteError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let cookie = jar.get(SESSION_COOKIE).ok_or(SiteError::Unauthorized)?;
        state
            .auth
            .authenticate(cookie.value())
            .await
            .map(Self)
            .ok_or(SiteError::Unauthorized)
    }
}
