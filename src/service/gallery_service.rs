//! Gallery service: orchestrates uploads, listing, deletion and featuring.

use std::sync::Arc;

use crate::domain::{
    GalleryPayload, GalleryRecord, ImageUpload, ListFilter, NewGalleryRecord, PhotoId,
    StoredImage, UploadImages, UploadRequest,
};
use crate::error::SiteError;
use crate::persistence::GalleryRepository;
use crate::storage::ObjectStorage;

/// Orchestration layer for all gallery operations.
///
/// Stateless coordinator: owns references to a [`GalleryRepository`] for
/// records and an [`ObjectStorage`] for image binaries. Uploads follow the
/// pattern: validate → write to storage → insert record; deletes remove
/// the record first, then its stored objects.
#[derive(Debug, Clone)]
pub struct GalleryService {
    repository: Arc<dyn GalleryRepository>,
    storage: Arc<dyn ObjectStorage>,
}

impl GalleryService {
    /// Creates a new `GalleryService`.
    #[must_use]
    pub fn new(repository: Arc<dyn GalleryRepository>, storage: Arc<dyn ObjectStorage>) -> Self {
        Self {
            repository,
            storage,
        }
    }

    /// Returns records newest first, optionally only the featured ones.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::StoreUnavailable`] if the record store fails.
    pub async fn list(&self, filter: ListFilter) -> Result<Vec<GalleryRecord>, SiteError> {
        self.repository.list(filter).await
    }

    /// Validates an upload, stores its images and inserts the record.
    ///
    /// Nothing is written when validation fails. If a storage write or the
    /// record insert fails, images already stored for this upload are
    /// deleted on a best-effort basis.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Validation`] for missing or mismatched files,
    /// [`SiteError::Storage`] if storing an image fails, or
    /// [`SiteError::StoreUnavailable`] if the insert fails.
    pub async fn upload(&self, request: UploadRequest) -> Result<GalleryRecord, SiteError> {
        let plan = request.into_plan()?;
        let kind = plan.kind();

        let mut stored = Vec::with_capacity(2);
        let payload = match self.store_images(&plan.images, &mut stored).await {
            Ok(payload) => payload,
            Err(e) => {
                self.discard(&stored).await;
                return Err(e);
            }
        };

        let new_record = NewGalleryRecord {
            description: plan.description,
            payload,
        };
        match self.repository.insert(new_record).await {
            Ok(record) => {
                tracing::info!(id = %record.id, kind = kind.as_str(), "gallery record created");
                Ok(record)
            }
            Err(e) => {
                self.discard(&stored).await;
                Err(e)
            }
        }
    }

    /// Removes a record, then deletes its stored images.
    ///
    /// Storage failures are logged and do not fail the call; the record is
    /// authoritative.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::PhotoNotFound`] if no record has this id.
    pub async fn delete(&self, id: PhotoId) -> Result<GalleryRecord, SiteError> {
        let record = self.repository.remove(id).await?;
        for image in record.payload.images() {
            if let Err(e) = self.storage.delete(&image.storage_id).await {
                tracing::warn!(
                    %id,
                    storage_id = %image.storage_id,
                    error = %e,
                    "stored image left behind after record deletion"
                );
            }
        }
        tracing::info!(%id, "gallery record deleted");
        Ok(record)
    }

    /// Sets the featured flag of a record.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::PhotoNotFound`] if no record has this id.
    pub async fn set_featured(
        &self,
        id: PhotoId,
        featured: bool,
    ) -> Result<GalleryRecord, SiteError> {
        let record = self.repository.set_featured(id, featured).await?;
        tracing::info!(%id, featured, "gallery record featured flag updated");
        Ok(record)
    }

    async fn store_images(
        &self,
        images: &UploadImages,
        stored: &mut Vec<StoredImage>,
    ) -> Result<GalleryPayload, SiteError> {
        match images {
            UploadImages::Single(photo) => {
                let image = self.store_one(photo, stored).await?;
                Ok(GalleryPayload::Single(image))
            }
            UploadImages::BeforeAfter { before, after } => {
                let before = self.store_one(before, stored).await?;
                let after = self.store_one(after, stored).await?;
                Ok(GalleryPayload::BeforeAfter { before, after })
            }
        }
    }

    async fn store_one(
        &self,
        upload: &ImageUpload,
        stored: &mut Vec<StoredImage>,
    ) -> Result<StoredImage, SiteError> {
        let image = self.storage.put(upload).await?;
        stored.push(image.clone());
        Ok(image)
    }

    /// Best-effort removal of images stored for a failed upload.
    async fn discard(&self, stored: &[StoredImage]) {
        for image in stored {
            if let Err(e) = self.storage.delete(&image.storage_id).await {
                tracing::warn!(
                    storage_id = %image.storage_id,
                    error = %e,
                    "orphaned stored image after failed upload"
                );
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use async_trait::async_trait;
    use axum::body::Bytes;
    use tokio::sync::Mutex;

    use super::*;
    use crate::domain::GalleryKind;
    use crate::persistence::MemoryGalleryRepository;

    /// In-memory storage with switchable failures.
    #[derive(Debug, Default)]
    struct FakeStorage {
        objects: Mutex<HashSet<String>>,
        counter: AtomicUsize,
        fail_put_after: Option<usize>,
        fail_delete: AtomicBool,
    }

    #[async_trait]
    impl ObjectStorage for FakeStorage {
        async fn put(&self, _image: &ImageUpload) -> Result<StoredImage, SiteError> {
            let n = self.counter.fetch_add(1, Ordering::SeqCst);
            if self.fail_put_after.is_some_and(|limit| n >= limit) {
                return Err(SiteError::Storage("quota exceeded".to_string()));
            }
            let storage_id = format!("obj-{n}");
            self.objects.lock().await.insert(storage_id.clone());
            Ok(StoredImage {
                url: format!("https://cdn.example/{storage_id}"),
                storage_id,
            })
        }

        async fn delete(&self, storage_id: &str) -> Result<(), SiteError> {
            if self.fail_delete.load(Ordering::SeqCst) {
                return Err(SiteError::Storage("unreachable".to_string()));
            }
            self.objects.lock().await.remove(storage_id);
            Ok(())
        }
    }

    /// Repository whose inserts always fail.
    #[derive(Debug)]
    struct BrokenInserts;

    #[async_trait]
    impl GalleryRepository for BrokenInserts {
        async fn list(&self, _filter: ListFilter) -> Result<Vec<GalleryRecord>, SiteError> {
            Ok(Vec::new())
        }
        async fn insert(&self, _record: NewGalleryRecord) -> Result<GalleryRecord, SiteError> {
            Err(SiteError::StoreUnavailable("connection reset".to_string()))
        }
        async fn remove(&self, id: PhotoId) -> Result<GalleryRecord, SiteError> {
            Err(SiteError::PhotoNotFound(id))
        }
        async fn set_featured(
            &self,
            id: PhotoId,
            _featured: bool,
        ) -> Result<GalleryRecord, SiteError> {
            Err(SiteError::PhotoNotFound(id))
        }
    }

    fn jpeg() -> ImageUpload {
        ImageUpload {
            file_name: Some("a.jpg".to_string()),
            content_type: Some("image/jpeg".to_string()),
            bytes: Bytes::from_static(b"jpeg"),
        }
    }

    fn single(description: &str) -> UploadRequest {
        UploadRequest {
            upload_type: Some("single".to_string()),
            description: Some(description.to_string()),
            photo: Some(jpeg()),
            ..Default::default()
        }
    }

    fn pair() -> UploadRequest {
        UploadRequest {
            upload_type: Some("before-after".to_string()),
            photo_before: Some(jpeg()),
            photo_after: Some(jpeg()),
            ..Default::default()
        }
    }

    fn make_service(storage: Arc<FakeStorage>) -> GalleryService {
        GalleryService::new(Arc::new(MemoryGalleryRepository::new()), storage)
    }

    #[tokio::test]
    async fn single_upload_creates_one_record() {
        let storage = Arc::new(FakeStorage::default());
        let service = make_service(Arc::clone(&storage));

        let Ok(record) = service.upload(single("Test")).await else {
            panic!("upload failed");
        };
        assert_eq!(record.kind(), GalleryKind::Single);
        assert_eq!(record.description.as_deref(), Some("Test"));
        assert!(!record.is_featured);

        let Ok(all) = service.list(ListFilter::All).await else {
            panic!("list failed");
        };
        assert_eq!(all, vec![record]);
        assert_eq!(storage.objects.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn before_after_upload_fills_both_slots() {
        let storage = Arc::new(FakeStorage::default());
        let service = make_service(Arc::clone(&storage));

        let Ok(record) = service.upload(pair()).await else {
            panic!("upload failed");
        };
        let GalleryPayload::BeforeAfter { before, after } = &record.payload else {
            panic!("expected before/after payload");
        };
        assert_ne!(before.storage_id, after.storage_id);
        assert_eq!(storage.objects.lock().await.len(), 2);
    }

    #[tokio::test]
    async fn invalid_upload_touches_nothing() {
        let storage = Arc::new(FakeStorage::default());
        let service = make_service(Arc::clone(&storage));

        let request = UploadRequest {
            upload_type: Some("single".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            service.upload(request).await,
            Err(SiteError::Validation(_))
        ));
        assert_eq!(storage.counter.load(Ordering::SeqCst), 0);
        let Ok(all) = service.list(ListFilter::All).await else {
            panic!("list failed");
        };
        assert!(all.is_empty());
    }

    #[tokio::test]
    async fn failed_second_write_discards_first() {
        let storage = Arc::new(FakeStorage {
            fail_put_after: Some(1),
            ..Default::default()
        });
        let service = make_service(Arc::clone(&storage));

        assert!(matches!(
            service.upload(pair()).await,
            Err(SiteError::Storage(_))
        ));
        assert!(storage.objects.lock().await.is_empty());
    }

    #[tokio::test]
    async fn failed_insert_discards_stored_images() {
        let storage = Arc::new(FakeStorage::default());
        let service = GalleryService::new(
            Arc::new(BrokenInserts),
            Arc::clone(&storage) as Arc<dyn ObjectStorage>,
        );

        assert!(matches!(
            service.upload(single("x")).await,
            Err(SiteError::StoreUnavailable(_))
        ));
        assert!(storage.objects.lock().await.is_empty());
    }

    #[tokio::test]
    async fn delete_removes_record_and_objects() {
        let storage = Arc::new(FakeStorage::default());
        let service = make_service(Arc::clone(&storage));
        let Ok(record) = service.upload(pair()).await else {
            panic!("upload failed");
        };

        assert!(service.delete(record.id).await.is_ok());
        assert!(storage.objects.lock().await.is_empty());
        assert!(matches!(
            service.delete(record.id).await,
            Err(SiteError::PhotoNotFound(_))
        ));
    }

    #[tokio::test]
    async fn storage_failure_does_not_fail_delete() {
        let storage = Arc::new(FakeStorage::default());
        let service = make_service(Arc::clone(&storage));
        let Ok(record) = service.upload(single("x")).await else {
            panic!("upload failed");
        };

        storage.fail_delete.store(true, Ordering::SeqCst);
        assert!(service.delete(record.id).await.is_ok());

        let Ok(all) = service.list(ListFilter::All).await else {
            panic!("list failed");
        };
        assert!(all.is_empty());
    }

    #[tokio::test]
    async fn feature_toggle_drives_featured_list() {
        let service = make_service(Arc::new(FakeStorage::default()));
        let Ok(record) = service.upload(single("x")).await else {
            panic!("upload failed");
        };

        let Ok(updated) = service.set_featured(record.id, true).await else {
            panic!("feature failed");
        };
        assert!(updated.is_featured);
        let Ok(featured) = service.list(ListFilter::FeaturedOnly).await else {
            panic!("list failed");
        };
        assert_eq!(featured.len(), 1);

        let Ok(_) = service.set_featured(record.id, false).await else {
            panic!("unfeature failed");
        };
        let Ok(featured) = service.list(ListFilter::FeaturedOnly).await else {
            panic!("list failed");
        };
        assert!(featured.is_empty());

        assert!(matches!(
            service.set_featured(PhotoId::new(404), true).await,
            Err(SiteError::PhotoNotFound(_))
        ));
    }
}
