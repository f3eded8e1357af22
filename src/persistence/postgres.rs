//! PostgreSQL implementation of the gallery store.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use super::GalleryRepository;
use super::models::{GalleryRow, PayloadColumns};
use crate::config::DatabaseConfig;
use crate::domain::{GalleryRecord, ListFilter, NewGalleryRecord, PhotoId};
use crate::error::SiteError;

const COLUMNS: &str = "id, item_type, description, is_featured, created_at, \
     image_url, image_storage_id, before_url, before_storage_id, after_url, after_storage_id";

/// PostgreSQL-backed gallery store using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresGalleryRepository {
    pool: PgPool,
}

impl PostgresGalleryRepository {
    /// Creates a store over an existing connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects using `config` and applies pending migrations.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::StoreUnavailable`] if the database cannot be
    /// reached or a migration fails.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, SiteError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .connect(&config.url)
            .await
            .map_err(db_error)?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| SiteError::StoreUnavailable(format!("migration failed: {e}")))?;

        tracing::info!(
            max_connections = config.max_connections,
            "connected to postgres"
        );
        Ok(Self::new(pool))
    }
}

fn db_error(e: sqlx::Error) -> SiteError {
    SiteError::StoreUnavailable(e.to_string())
}

#[async_trait]
impl GalleryRepository for PostgresGalleryRepository {
    async fn list(&self, filter: ListFilter) -> Result<Vec<GalleryRecord>, SiteError> {
        let sql = match filter {
            ListFilter::All => format!(
                "SELECT {COLUMNS} FROM gallery_items ORDER BY created_at DESC, id DESC"
            ),
            ListFilter::FeaturedOnly => format!(
                "SELECT {COLUMNS} FROM gallery_items WHERE is_featured \
                 ORDER BY created_at DESC, id DESC"
            ),
        };
        let rows = sqlx::query_as::<_, GalleryRow>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;

        rows.into_iter().map(GalleryRow::into_record).collect()
    }

    async fn insert(&self, record: NewGalleryRecord) -> Result<GalleryRecord, SiteError> {
        let cols = PayloadColumns::from(&record.payload);
        let sql = format!(
            "INSERT INTO gallery_items (item_type, description, image_url, image_storage_id, \
             before_url, before_storage_id, after_url, after_storage_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, GalleryRow>(&sql)
            .bind(record.payload.kind().as_str())
            .bind(record.description.as_deref())
            .bind(cols.image_url)
            .bind(cols.image_storage_id)
            .bind(cols.before_url)
            .bind(cols.before_storage_id)
            .bind(cols.after_url)
            .bind(cols.after_storage_id)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error)?;

        row.into_record()
    }

    async fn remove(&self, id: PhotoId) -> Result<GalleryRecord, SiteError> {
        let sql = format!("DELETE FROM gallery_items WHERE id = $1 RETURNING {COLUMNS}");
        let row = sqlx::query_as::<_, GalleryRow>(&sql)
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?
            .ok_or(SiteError::PhotoNotFound(id))?;

        row.into_record()
    }

    async fn set_featured(
        &self,
        id: PhotoId,
        featured: bool,
    ) -> Result<GalleryRecord, SiteError> {
        let sql = format!(
            "UPDATE gallery_items SET is_featured = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, GalleryRow>(&sql)
            .bind(id.get())
            .bind(featured)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?
            .ok_or(SiteError::PhotoNotFound(id))?;

        row.into_record()
    }
}
