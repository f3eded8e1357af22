//! Contact form DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ContactMessage;
use crate::error::ErrorBody;

/// Request body for `POST /send-email`.
///
/// Missing fields deserialize as empty and are rejected by validation, so
/// an incomplete form yields a 400 with a field-level message.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactRequest {
    /// Visitor name.
    pub name: String,
    /// Visitor email address.
    pub email: String,
    /// Phone number.
    pub phone: Option<String>,
    /// Site address.
    pub address: Option<String>,
    /// Kind of property.
    pub property_type: Option<String>,
    /// Kind of project.
    pub project_type: Option<String>,
    /// Free-text message.
    pub message: String,
}

impl From<ContactRequest> for ContactMessage {
    fn from(req: ContactRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
            phone: req.phone,
            address: req.address,
            property_type: req.property_type,
            project_type: req.project_type,
            message: req.message,
        }
    }
}

/// Response body for a relayed contact message.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ContactResponse {
    /// Always `true`.
    pub success: bool,
    /// Confirmation shown to the visitor.
    pub message: String,
}

/// Error body for `POST /send-email`.
///
/// Carries the usual `error` object plus `success`/`message` at the top
/// level, which is what the contact form script reads.
#[derive(Debug, Serialize, ToSchema)]
pub struct ContactFailure {
    /// Always `false`.
    pub success: bool,
    /// Message shown to the visitor.
    pub message: String,
    /// Structured error payload.
    pub error: ErrorBody,
}
