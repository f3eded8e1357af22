//! Gallery store backed by a single JSON array file.
//!
//! Every operation reads the whole file, and mutations rewrite it through a
//! sibling temp file followed by a rename. A [`tokio::sync::Mutex`] makes
//! each read-modify-write exclusive within the process; the file must not
//! be shared with other writers.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use super::GalleryRepository;
use crate::domain::{
    GalleryRecord, ListFilter, NewGalleryRecord, PhotoId, sort_newest_first,
};
use crate::error::SiteError;

/// JSON-file gallery store.
///
/// Ids are millisecond timestamps, bumped past the largest id on file so
/// they stay unique and increasing even for uploads within the same
/// millisecond.
#[derive(Debug)]
pub struct JsonFileGalleryRepository {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileGalleryRepository {
    /// Opens the store at `path`, creating parent directories as needed.
    /// A missing file is treated as an empty gallery.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::StoreUnavailable`] if the parent directory
    /// cannot be created.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, SiteError> {
        let path = path.into();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| store_error(parent, &e))?;
        }
        Ok(Self {
            path,
            lock: Mutex::new(()),
        })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Vec<GalleryRecord>, SiteError> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(store_error(&self.path, &e)),
        };
        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        serde_json::from_slice(&raw).map_err(|e| {
            SiteError::StoreUnavailable(format!("{} is not a valid gallery file: {e}", self.path.display()))
        })
    }

    async fn save(&self, records: &[GalleryRecord]) -> Result<(), SiteError> {
        let json = serde_json::to_vec_pretty(records)
            .map_err(|e| SiteError::Internal(format!("gallery serialization failed: {e}")))?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| store_error(&tmp, &e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| store_error(&self.path, &e))
    }
}

fn store_error(path: &Path, err: &std::io::Error) -> SiteError {
    SiteError::StoreUnavailable(format!("{}: {err}", path.display()))
}

fn next_id(records: &[GalleryRecord]) -> PhotoId {
    let now = Utc::now().timestamp_millis();
    let after_last = records
        .iter()
        .map(|r| r.id.get())
        .max()
        .map_or(i64::MIN, |max| max.saturating_add(1));
    PhotoId::new(now.max(after_last))
}

#[async_trait]
impl GalleryRepository for JsonFileGalleryRepository {
    async fn list(&self, filter: ListFilter) -> Result<Vec<GalleryRecord>, SiteError> {
        let _guard = self.lock.lock().await;
        let mut records = self.load().await?;
        records.retain(|r| filter.matches(r));
        sort_newest_first(&mut records);
        Ok(records)
    }

    async fn insert(&self, record: NewGalleryRecord) -> Result<GalleryRecord, SiteError> {
        let _guard = self.lock.lock().await;
        let mut records = self.load().await?;
        let record = record.into_record(next_id(&records), Utc::now());
        records.push(record.clone());
        self.save(&records).await?;
        Ok(record)
    }

    async fn remove(&self, id: PhotoId) -> Result<GalleryRecord, SiteError> {
        let _guard = self.lock.lock().await;
        let mut records = self.load().await?;
        let pos = records
            .iter()
            .position(|r| r.id == id)
            .ok_or(SiteError::PhotoNotFound(id))?;
        let removed = records.remove(pos);
        self.save(&records).await?;
        Ok(removed)
    }

    async fn set_featured(
        &self,
        id: PhotoId,
        featured: bool,
    ) -> Result<GalleryRecord, SiteError> {
        let _guard = self.lock.lock().await;
        let mut records = self.load().await?;
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(SiteError::PhotoNotFound(id))?;
        record.is_featured = featured;
        let updated = record.clone();
        self.save(&records).await?;
        Ok(updated)
    }
}
