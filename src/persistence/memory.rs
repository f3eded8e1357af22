//! In-memory gallery store.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::GalleryRepository;
use crate::domain::{
    GalleryRecord, ListFilter, NewGalleryRecord, PhotoId, sort_newest_first,
};
use crate::error::SiteError;

#[derive(Debug)]
struct MemoryState {
    next_id: i64,
    records: Vec<GalleryRecord>,
}

/// Gallery store kept in process memory. Contents are lost on restart.
///
/// Ids come from a counter starting at 1 and are never reused.
#[derive(Debug)]
pub struct MemoryGalleryRepository {
    state: RwLock<MemoryState>,
}

impl MemoryGalleryRepository {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: RwLock::new(MemoryState {
                next_id: 1,
                records: Vec::new(),
            }),
        }
    }
}

impl Default for MemoryGalleryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GalleryRepository for MemoryGalleryRepository {
    async fn list(&self, filter: ListFilter) -> Result<Vec<GalleryRecord>, SiteError> {
        let state = self.state.read().await;
        let mut records: Vec<GalleryRecord> = state
            .records
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        sort_newest_first(&mut records);
        Ok(records)
    }

    async fn insert(&self, record: NewGalleryRecord) -> Result<GalleryRecord, SiteError> {
        let mut state = self.state.write().await;
        let id = PhotoId::new(state.next_id);
        state.next_id = state.next_id.saturating_add(1);
        let record = record.into_record(id, Utc::now());
        state.records.push(record.clone());
        Ok(record)
    }

    async fn remove(&self, id: PhotoId) -> Result<GalleryRecord, SiteError> {
        let mut state = self.state.write().await;
        let pos = state
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or(SiteError::PhotoNotFound(id))?;
        Ok(state.records.remove(pos))
    }

    async fn set_featured(
        &self,
        id: PhotoId,
        featured: bool,
    ) -> Result<GalleryRecord, SiteError> {
        let mut state = self.state.write().await;
        let record = state
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(SiteError::PhotoNotFound(id))?;
        record.is_featured = featured;
        Ok(record.clone())
    }
}
