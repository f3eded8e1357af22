//! OpenAPI document for the JSON endpoints.

use utoipa::OpenApi;

use crate::api::dto::{
    ContactFailure, ContactRequest, ContactResponse, DeleteResponse, FeatureRequest,
    GalleryRecordDto, LoginRequest, SessionResponse, SessionStatus, StoredImageDto, UploadForm,
};
use crate::api::handlers::{admin, contact, gallery, system};
use crate::error::{ErrorBody, ErrorResponse};

/// Generated OpenAPI specification.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "vitrine",
        description = "Gallery administration, admin sessions and contact form relay."
    ),
    paths(
        gallery::list_photos,
        gallery::upload_photo,
        gallery::delete_photo,
        gallery::feature_photo,
        admin::login,
        admin::logout,
        admin::session_status,
        contact::send_email,
        system::health_handler,
    ),
    components(schemas(
        GalleryRecordDto,
        StoredImageDto,
        FeatureRequest,
        DeleteResponse,
        UploadForm,
        LoginRequest,
        SessionResponse,
        SessionStatus,
        ContactRequest,
        ContactResponse,
        ContactFailure,
        ErrorResponse,
        ErrorBody,
        system::HealthResponse,
    )),
    tags(
        (name = "Gallery", description = "Gallery records and their images"),
        (name = "Admin", description = "Admin session"),
        (name = "Contact", description = "Contact form relay"),
        (name = "System", description = "Service status"),
    )
)]
pub struct ApiDoc;
