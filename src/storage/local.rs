//! Local-disk object storage.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::ObjectStorage;
use crate::domain::{ImageUpload, StoredImage};
use crate::error::SiteError;

/// Stores images as files in one directory, named `<uuid>.<ext>`.
///
/// The directory is expected to be served under `url_prefix` (see
/// [`crate::api::handlers::pages`]).
#[derive(Debug, Clone)]
pub struct LocalDiskStorage {
    dir: PathBuf,
    url_prefix: String,
}

impl LocalDiskStorage {
    /// Opens the storage, creating `dir` if needed.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Storage`] if the directory cannot be created.
    pub async fn open(dir: impl Into<PathBuf>, url_prefix: &str) -> Result<Self, SiteError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| SiteError::Storage(format!("{}: {e}", dir.display())))?;
        Ok(Self {
            dir,
            url_prefix: url_prefix.trim_end_matches('/').to_string(),
        })
    }

    /// Directory files are written to.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Resolves a storage id to a path inside the directory, refusing ids
    /// that could escape it.
    fn object_path(&self, storage_id: &str) -> Result<PathBuf, SiteError> {
        let valid = !storage_id.is_empty()
            && !storage_id.starts_with('.')
            && storage_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if valid {
            Ok(self.dir.join(storage_id))
        } else {
            Err(SiteError::Storage(format!("invalid storage id: {storage_id}")))
        }
    }
}

#[async_trait]
impl ObjectStorage for LocalDiskStorage {
    async fn put(&self, image: &ImageUpload) -> Result<StoredImage, SiteError> {
        let storage_id = match image.extension() {
            Some(ext) => format!("{}.{ext}", uuid::Uuid::new_v4()),
            None => uuid::Uuid::new_v4().to_string(),
        };
        let path = self.object_path(&storage_id)?;
        tokio::fs::write(&path, &image.bytes)
            .await
            .map_err(|e| SiteError::Storage(format!("{}: {e}", path.display())))?;

        tracing::debug!(%storage_id, bytes = image.bytes.len(), "image written to disk");
        Ok(StoredImage {
            url: format!("{}/{storage_id}", self.url_prefix),
            storage_id,
        })
    }

    async fn delete(&self, storage_id: &str) -> Result<(), SiteError> {
        let path = self.object_path(storage_id)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SiteError::Storage(format!("{}: {e}", path.display()))),
        }
    }
}
