//! Cloudinary object storage over its REST upload API.
//!
//! Requests are signed: the parameters (minus `file`, `api_key`,
//! `resource_type` and `cloud_name`) are sorted by name, joined as
//! `k=v&k=v`, suffixed with the API secret and hashed with SHA-1.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha1::{Digest, Sha1};

use super::ObjectStorage;
use crate::config::CloudinaryConfig;
use crate::domain::{ImageUpload, StoredImage};
use crate::error::SiteError;

const DEFAULT_API_BASE: &str = "https://api.cloudinary.com/v1_1";

/// Cloudinary-backed image storage. The storage id is the Cloudinary
/// `public_id`.
#[derive(Debug, Clone)]
pub struct CloudinaryStorage {
    client: reqwest::Client,
    api_base: String,
    config: CloudinaryConfig,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

impl CloudinaryStorage {
    /// Creates the adapter for the public Cloudinary API.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Storage`] if the HTTP client cannot be built.
    pub fn new(config: CloudinaryConfig) -> Result<Self, SiteError> {
        Self::with_api_base(config, DEFAULT_API_BASE)
    }

    /// Creates the adapter against a custom API base URL.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Storage`] if the HTTP client cannot be built.
    pub fn with_api_base(config: CloudinaryConfig, api_base: &str) -> Result<Self, SiteError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SiteError::Storage(format!("http client: {e}")))?;
        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            config,
        })
    }

    fn endpoint(&self, action: &str) -> String {
        format!("{}/{}/image/{action}", self.api_base, self.config.cloud_name)
    }

    /// Builds the signed text fields of a request.
    fn signed_fields(&self, mut params: Vec<(&'static str, String)>) -> Form {
        params.push(("timestamp", Utc::now().timestamp().to_string()));
        let signature = sign(&params, &self.config.api_secret);

        let mut form = Form::new()
            .text("api_key", self.config.api_key.clone())
            .text("signature", signature);
        for (key, value) in params {
            form = form.text(key, value);
        }
        form
    }

    async fn send<T>(&self, action: &str, form: Form) -> Result<T, SiteError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let response = self
            .client
            .post(self.endpoint(action))
            .multipart(form)
            .send()
            .await
            .map_err(|e| SiteError::Storage(format!("cloudinary {action}: {e}")))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| SiteError::Storage(format!("cloudinary {action}: {e}")))?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ApiErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| String::from_utf8_lossy(&body).into_owned());
            return Err(SiteError::Storage(format!(
                "cloudinary {action} returned {status}: {message}"
            )));
        }

        serde_json::from_slice(&body)
            .map_err(|e| SiteError::Storage(format!("cloudinary {action} response: {e}")))
    }
}

/// Computes the hex SHA-1 request signature for `params`.
fn sign(params: &[(&str, String)], api_secret: &str) -> String {
    let mut sorted: Vec<&(&str, String)> = params.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));
    let joined = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");
    hex::encode(Sha1::digest(format!("{joined}{api_secret}").as_bytes()))
}

#[async_trait]
impl ObjectStorage for CloudinaryStorage {
    async fn put(&self, image: &ImageUpload) -> Result<StoredImage, SiteError> {
        let mut part = Part::bytes(image.bytes.to_vec())
            .file_name(image.file_name.clone().unwrap_or_else(|| "upload".to_string()));
        if let Some(content_type) = image.content_type.as_deref() {
            part = part
                .mime_str(content_type)
                .map_err(|e| SiteError::Storage(format!("invalid content type: {e}")))?;
        }

        let form = self
            .signed_fields(vec![("folder", self.config.folder.clone())])
            .part("file", part);
        let uploaded: UploadResponse = self.send("upload", form).await?;

        tracing::debug!(public_id = %uploaded.public_id, "image uploaded to cloudinary");
        Ok(StoredImage {
            url: uploaded.secure_url,
            storage_id: uploaded.public_id,
        })
    }

    async fn delete(&self, storage_id: &str) -> Result<(), SiteError> {
        let form = self.signed_fields(vec![("public_id", storage_id.to_string())]);
        let destroyed: DestroyResponse = self.send("destroy", form).await?;
        match destroyed.result.as_str() {
            "ok" | "not found" => Ok(()),
            other => Err(SiteError::Storage(format!(
                "cloudinary destroy of {storage_id} returned {other}"
            ))),
        }
    }
}
