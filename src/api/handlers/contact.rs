//! Contact form handler.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};

use crate::api::dto::{ContactFailure, ContactRequest, ContactResponse};
use crate::app_state::AppState;
use crate::domain::ContactMessage;
use crate::error::SiteError;

/// Failure of `POST /send-email`, rendered as a [`ContactFailure`].
#[derive(Debug)]
pub struct ContactError(pub SiteError);

impl IntoResponse for ContactError {
    fn into_response(self) -> Response {
        let status = self.0.status_code();
        self.0.log();
        let error = self.0.body();
        let body = ContactFailure {
            success: false,
            message: error.message.clone(),
            error,
        };
        (status, Json(body)).into_response()
    }
}

/// `POST /send-email`: Relay a contact-form message to the site owner.
///
/// # Errors
///
/// Fails with a validation error for blank required fields and a delivery
/// error when the relay fails or is not configured.
#[utoipa::path(
    post,
    path = "/send-email",
    tag = "Contact",
    summary = "Send a contact message",
    description = "Validates the form and relays it once over SMTP with Reply-To set to the visitor.",
    request_body = ContactRequest,
    responses(
        (status = 200, description = "Message relayed", body = ContactResponse),
        (status = 400, description = "Missing or invalid fields", body = ContactFailure),
        (status = 500, description = "Delivery failed", body = ContactFailure),
    )
)]
pub async fn send_email(
    State(state): State<AppState>,
    body: Result<Json<ContactRequest>, JsonRejection>,
) -> Result<Json<ContactResponse>, ContactError> {
    relay(&state, body).await.map(Json).map_err(ContactError)
}

async fn relay(
    state: &AppState,
    body: Result<Json<ContactRequest>, JsonRejection>,
) -> Result<ContactResponse, SiteError> {
    let Json(req) = body?;
    let message = ContactMessage::from(req).normalized()?;
    let mailer = state
        .mailer
        .as_ref()
        .ok_or_else(|| SiteError::Delivery("no mail relay configured".to_string()))?;
    mailer.send(message).await?;
    Ok(ContactResponse {
        success: true,
        message: "Your message has been sent.".to_string(),
    })
}

/// Contact routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/send-email", post(send_email))
}
