//! Admin session handlers: login, logout and session status.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_extra::extract::cookie::CookieJar;

use crate::api::dto::{LoginRequest, SessionResponse, SessionStatus};
use crate::app_state::AppState;
use crate::auth::SESSION_COOKIE;
use crate::error::{ErrorResponse, SiteError};

/// `POST /admin/login`: Open an admin session.
///
/// # Errors
///
/// Returns [`SiteError::InvalidCredentials`] when the credentials do not
/// match.
#[utoipa::path(
    post,
    path = "/admin/login",
    tag = "Admin",
    summary = "Log in",
    description = "Checks the admin credentials and sets an HttpOnly session cookie.",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in, session cookie set", body = SessionResponse),
        (status = 400, description = "Malformed body", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, SiteError> {
    let Json(req) = body?;
    let value = state.auth.login(&req.username, &req.password).await?;
    let jar = jar.add(state.auth.session_cookie(value));
    Ok((jar, Json(SessionResponse { success: true })))
}

/// `POST /admin/logout`: End the current admin session, if any.
#[utoipa::path(
    post,
    path = "/admin/logout",
    tag = "Admin",
    summary = "Log out",
    description = "Revokes the session behind the cookie and clears it. Succeeds without a session too.",
    responses(
        (status = 200, description = "Logged out", body = SessionResponse),
    )
)]
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state.auth.logout(cookie.value()).await;
    }
    let jar = jar.remove(state.auth.removal_cookie());
    (jar, Json(SessionResponse { success: true }))
}

/// `GET /admin/session`: Report whether the caller is logged in.
#[utoipa::path(
    get,
    path = "/admin/session",
    tag = "Admin",
    summary = "Session status",
    description = "Lets the admin page decide whether to show the login form.",
    responses(
        (status = 200, description = "Session status", body = SessionStatus),
    )
)]
pub async fn session_status(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let authenticated = match jar.get(SESSION_COOKIE) {
        Some(cookie) => state.auth.authenticate(cookie.value()).await.is_some(),
        None => false,
    };
    Json(SessionStatus { authenticated })
}

/// Admin session routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/login", post(login))
        .route("/admin/logout", post(logout))
        .route("/admin/session", get(session_status))
}
