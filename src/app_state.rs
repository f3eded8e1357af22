//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::auth::AdminGate;
use crate::config::{RecordStoreConfig, SiteConfig, StorageConfig};
use crate::error::SiteError;
use crate::mail::Mailer;
use crate::persistence::{
    GalleryRepository, JsonFileGalleryRepository, MemoryGalleryRepository,
    PostgresGalleryRepository,
};
use crate::service::GalleryService;
use crate::storage::{CloudinaryStorage, LocalDiskStorage, ObjectStorage};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Gallery service for all record and image operations.
    pub gallery: Arc<GalleryService>,
    /// Admin login and session checks.
    pub auth: Arc<AdminGate>,
    /// Contact-form relay; `None` when no SMTP relay is configured.
    pub mailer: Option<Arc<Mailer>>,
}

impl AppState {
    /// Connects the configured record store, object storage and mail relay.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::StoreUnavailable`] if the record store cannot be
    /// opened, [`SiteError::Storage`] if the object storage cannot be set up,
    /// and [`SiteError::Delivery`] for an unusable mail configuration.
    pub async fn from_config(config: &SiteConfig) -> Result<Self, SiteError> {
        let repository: Arc<dyn GalleryRepository> = match &config.record_store {
            RecordStoreConfig::Postgres(db) => {
                Arc::new(PostgresGalleryRepository::connect(db).await?)
            }
            RecordStoreConfig::JsonFile(path) => {
                Arc::new(JsonFileGalleryRepository::open(path.clone()).await?)
            }
            RecordStoreConfig::Memory => {
                tracing::warn!("gallery records are kept in memory and lost on restart");
                Arc::new(MemoryGalleryRepository::new())
            }
        };

        let storage: Arc<dyn ObjectStorage> = match &config.storage {
            StorageConfig::Local { dir, url_prefix } => {
                Arc::new(LocalDiskStorage::open(dir.clone(), url_prefix).await?)
            }
            StorageConfig::Cloudinary(cloudinary) => {
                Arc::new(CloudinaryStorage::new(cloudinary.clone())?)
            }
        };

        let mailer = match &config.mail {
            Some(mail) => Some(Arc::new(Mailer::smtp(mail)?)),
            None => {
                tracing::warn!("EMAIL_HOST not set, contact form delivery is disabled");
                None
            }
        };

        Ok(Self {
            gallery: Arc::new(GalleryService::new(repository, storage)),
            auth: Arc::new(AdminGate::new(&config.admin)?),
            mailer,
        })
    }
}
