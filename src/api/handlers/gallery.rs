//! Gallery handlers: list, upload, delete and feature.

use axum::extract::multipart::{Field, MultipartRejection};
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{DefaultBodyLimit, Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{
    DeleteResponse, FeatureRequest, GalleryRecordDto, PhotoListParams, UploadForm,
};
use crate::app_state::AppState;
use crate::auth::AdminSession;
use crate::domain::{ImageUpload, PhotoId, UploadRequest};
use crate::error::{ErrorResponse, SiteError};

/// `GET /api/photos`: List gallery records, newest first.
///
/// # Errors
///
/// Returns [`SiteError::StoreUnavailable`] if the record store fails.
#[utoipa::path(
    get,
    path = "/api/photos",
    tag = "Gallery",
    summary = "List gallery records",
    description = "Returns every gallery record newest first. With `featured=true` only featured records are returned.",
    params(PhotoListParams),
    responses(
        (status = 200, description = "Gallery records", body = Vec<GalleryRecordDto>),
        (status = 500, description = "Record store unavailable", body = ErrorResponse),
    )
)]
pub async fn list_photos(
    State(state): State<AppState>,
    Query(params): Query<PhotoListParams>,
) -> Result<impl IntoResponse, SiteError> {
    let records = state.gallery.list(params.filter()).await?;
    let data: Vec<GalleryRecordDto> = records.into_iter().map(GalleryRecordDto::from).collect();
    Ok(Json(data))
}

/// `POST /api/upload`: Upload a single photo or a before/after pair.
///
/// # Errors
///
/// Returns [`SiteError::Unauthorized`] without an admin session,
/// [`SiteError::Validation`] for missing or mismatched files, and a 500
/// error when storage or the record store fails.
#[utoipa::path(
    post,
    path = "/api/upload",
    tag = "Gallery",
    summary = "Upload a gallery record",
    description = "Stores the submitted image(s) and creates one gallery record. `single` needs `photo`; `before-after` needs `photo_before` and `photo_after` (or `photo_avant` / `photo_apres`).",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Record created", body = GalleryRecordDto),
        (status = 400, description = "Missing or mismatched files", body = ErrorResponse),
        (status = 401, description = "Admin session required", body = ErrorResponse),
        (status = 500, description = "Storage or record store failure", body = ErrorResponse),
    )
)]
pub async fn upload_photo(
    State(state): State<AppState>,
    AdminSession(_admin): AdminSession,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, SiteError> {
    let request = read_upload(multipart?).await?;
    let record = state.gallery.upload(request).await?;
    Ok((StatusCode::CREATED, Json(GalleryRecordDto::from(record))))
}

/// `POST /api/delete/{id}`: Delete a record and its stored images.
///
/// # Errors
///
/// Returns [`SiteError::Unauthorized`] without an admin session and
/// [`SiteError::PhotoNotFound`] if the record does not exist.
#[utoipa::path(
    post,
    path = "/api/delete/{id}",
    tag = "Gallery",
    summary = "Delete a gallery record",
    description = "Removes the record, then deletes its images from object storage on a best-effort basis.",
    params(
        ("id" = i64, Path, description = "Record id"),
    ),
    responses(
        (status = 200, description = "Record deleted", body = DeleteResponse),
        (status = 401, description = "Admin session required", body = ErrorResponse),
        (status = 404, description = "Record not found", body = ErrorResponse),
    )
)]
pub async fn delete_photo(
    State(state): State<AppState>,
    AdminSession(_admin): AdminSession,
    id: Result<Path<PhotoId>, PathRejection>,
) -> Result<impl IntoResponse, SiteError> {
    let Path(id) = id?;
    let record = state.gallery.delete(id).await?;
    Ok(Json(DeleteResponse {
        success: true,
        id: record.id,
    }))
}

/// `POST /api/photos/{id}/feature`: Set or clear the featured flag.
///
/// # Errors
///
/// Returns [`SiteError::Unauthorized`] without an admin session and
/// [`SiteError::PhotoNotFound`] if the record does not exist.
#[utoipa::path(
    post,
    path = "/api/photos/{id}/feature",
    tag = "Gallery",
    summary = "Feature a gallery record",
    description = "Sets whether the record appears in the featured selection.",
    params(
        ("id" = i64, Path, description = "Record id"),
    ),
    request_body = FeatureRequest,
    responses(
        (status = 200, description = "Updated record", body = GalleryRecordDto),
        (status = 400, description = "Malformed body", body = ErrorResponse),
        (status = 401, description = "Admin session required", body = ErrorResponse),
        (status = 404, description = "Record not found", body = ErrorResponse),
    )
)]
pub async fn feature_photo(
    State(state): State<AppState>,
    AdminSession(_admin): AdminSession,
    id: Result<Path<PhotoId>, PathRejection>,
    body: Result<Json<FeatureRequest>, JsonRejection>,
) -> Result<impl IntoResponse, SiteError> {
    let Path(id) = id?;
    let Json(req) = body?;
    let record = state.gallery.set_featured(id, req.is_featured).await?;
    Ok(Json(GalleryRecordDto::from(record)))
}

/// Collects the admin form into an [`UploadRequest`].
///
/// File inputs the admin left empty arrive as parts without a file name
/// or content and are treated as absent.
async fn read_upload(mut multipart: Multipart) -> Result<UploadRequest, SiteError> {
    let mut request = UploadRequest::default();
    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        match name.as_str() {
            "description" => request.description = Some(field.text().await?),
            "uploadType" | "upload_type" | "type" => {
                request.upload_type = Some(field.text().await?);
            }
            "photo" => request.photo = read_image(field).await?,
            "photo_before" | "photo_avant" => request.photo_before = read_image(field).await?,
            "photo_after" | "photo_apres" => request.photo_after = read_image(field).await?,
            other => tracing::debug!(field = other, "ignoring unknown upload field"),
        }
    }
    Ok(request)
}

async fn read_image(field: Field<'_>) -> Result<Option<ImageUpload>, SiteError> {
    let file_name = field
        .file_name()
        .filter(|name| !name.is_empty())
        .map(str::to_string);
    let content_type = field.content_type().map(str::to_string);
    let bytes = field.bytes().await?;
    if bytes.is_empty() && file_name.is_none() {
        return Ok(None);
    }
    Ok(Some(ImageUpload {
        file_name,
        content_type,
        bytes,
    }))
}

/// Gallery routes. Upload bodies are capped at `upload_max_bytes`.
pub fn routes(upload_max_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/api/photos", get(list_photos))
        .route(
            "/api/upload",
            post(upload_photo).layer(DefaultBodyLimit::max(upload_max_bytes)),
        )
        .route("/api/delete/{id}", post(delete_photo))
        .route("/api/photos/{id}/feature", post(feature_photo))
}
