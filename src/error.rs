//! Site error types with HTTP status code mapping.
//!
//! [`SiteError`] is the central error type for every request path. Each
//! variant maps to a specific HTTP status code and structured JSON error
//! response.

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::PhotoId;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 1001,
///     "message": "invalid request: a single upload needs a photo file"
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code (see the table on [`SiteError`]).
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category        | HTTP Status               |
/// |-----------|-----------------|---------------------------|
/// | 1000–1099 | Validation      | 400 Bad Request           |
/// | 1100–1199 | Authentication  | 401 Unauthorized          |
/// | 2000–2999 | Not Found       | 404 Not Found             |
/// | 3000–3999 | Downstream      | 500 Internal Server Error |
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    /// Request validation failed (missing or mismatched upload files,
    /// blank contact fields, ...).
    #[error("invalid request: {0}")]
    Validation(String),

    /// No valid admin session accompanies the request.
    #[error("authentication required")]
    Unauthorized,

    /// Submitted admin credentials do not match.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// No gallery record carries the given id.
    #[error("photo not found: {0}")]
    PhotoNotFound(PhotoId),

    /// The record store could not be reached or failed the query.
    #[error("record store unavailable: {0}")]
    StoreUnavailable(String),

    /// The object storage backend rejected or failed an operation.
    #[error("object storage error: {0}")]
    Storage(String),

    /// The mail relay failed to deliver a message.
    #[error("mail delivery failed: {0}")]
    Delivery(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl SiteError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::Validation(_) => 1001,
            Self::Unauthorized => 1101,
            Self::InvalidCredentials => 1102,
            Self::PhotoNotFound(_) => 2001,
            Self::Internal(_) => 3000,
            Self::StoreUnavailable(_) => 3001,
            Self::Storage(_) => 3002,
            Self::Delivery(_) => 3003,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::PhotoNotFound(_) => StatusCode::NOT_FOUND,
            Self::StoreUnavailable(_)
            | Self::Storage(_)
            | Self::Delivery(_)
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to the caller.
    ///
    /// Delivery failures carry transport details that belong in the logs,
    /// so callers only see a generic sentence.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::Delivery(_) => "the message could not be sent, please try again later".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<JsonRejection> for SiteError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for SiteError {
    fn from(rejection: PathRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<MultipartRejection> for SiteError {
    fn from(rejection: MultipartRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<MultipartError> for SiteError {
    fn from(err: MultipartError) -> Self {
        Self::Validation(err.body_text())
    }
}

impl SiteError {
    /// Structured body describing this error to the caller.
    #[must_use]
    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            code: self.error_code(),
            message: self.public_message(),
        }
    }

    /// Logs server-side failures; client errors are not logged.
    pub(crate) fn log(&self) {
        if self.status_code().is_server_error() {
            tracing::error!(error = %self, code = self.error_code(), "request failed");
        }
    }
}

impl IntoResponse for SiteError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        self.log();
        let body = ErrorResponse { error: self.body() };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_taxonomy() {
        assert_eq!(
            SiteError::Validation("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(SiteError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            SiteError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            SiteError::PhotoNotFound(PhotoId::new(4)).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            SiteError::StoreUnavailable("down".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            SiteError::Delivery("smtp".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn delivery_details_stay_out_of_public_message() {
        let err = SiteError::Delivery("535 auth rejected for user@example.com".into());
        assert!(!err.public_message().contains("535"));

        let err = SiteError::PhotoNotFound(PhotoId::new(9));
        assert_eq!(err.public_message(), "photo not found: 9");
    }

    #[tokio::test]
    async fn into_response_sets_status_and_body() {
        let response = SiteError::PhotoNotFound(PhotoId::new(3)).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let Ok(bytes) = axum::body::to_bytes(response.into_body(), usize::MAX).await else {
            panic!("body read failed");
        };
        let Ok(json) = serde_json::from_slice::<serde_json::Value>(&bytes) else {
            panic!("body is not json");
        };
        assert_eq!(json["error"]["code"], 2001);
        assert_eq!(json["error"]["message"], "photo not found: 3");
    }
}
