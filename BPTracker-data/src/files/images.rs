//! Permanent storage for photos of the cuff display attached to records.
//!
//! Capturing the photo happens elsewhere; this store only copies a captured file into
//! the images directory and manages what is there.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use thiserror::Error;
use tokio::fs;
use tracing::{debug, error, info};
use uuid::Uuid;

/// Directory under the data directory that holds the images
pub const IMAGES_DIR_NAME: &str = "bp_images";

#[derive(Debug, Error)]
pub enum ImageStoreError {
    /// The OS refused access to the source or the images directory
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Image not found: {0}")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(std::io::Error),
}

impl From<std::io::Error> for ImageStoreError {
    fn from(error: std::io::Error) -> Self {
        match error.kind() {
            ErrorKind::PermissionDenied => ImageStoreError::PermissionDenied(error.to_string()),
            ErrorKind::NotFound => ImageStoreError::NotFound(error.to_string()),
            _ => ImageStoreError::Io(error),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ImageStore {
    dir: PathBuf,
}

impl ImageStore {
    /// Store rooted at `data_dir/bp_images`
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            dir: data_dir.as_ref().join(IMAGES_DIR_NAME),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    async fn ensure_dir(&self) -> Result<(), ImageStoreError> {
        fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    /// Copy a captured image into the store and return its permanent path
    pub async fn save(&self, source: impl AsRef<Path>) -> Result<PathBuf, ImageStoreError> {
        let source = source.as_ref();
        self.ensure_dir().await?;

        let target = self.dir.join(format!("bp_{}.jpg", Uuid::new_v4()));
        fs::copy(source, &target).await.map_err(|e| {
            error!("Failed to save image {}: {}", source.display(), e);
            ImageStoreError::from(e)
        })?;

        info!("Saved image to {}", target.display());
        Ok(target)
    }

    /// Remove an image. Returns false when there was nothing to delete.
    pub async fn delete(&self, path: impl AsRef<Path>) -> Result<bool, ImageStoreError> {
        match fs::remove_file(path.as_ref()).await {
            Ok(()) => {
                debug!("Deleted image {}", path.as_ref().display());
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn exists(&self, path: impl AsRef<Path>) -> bool {
        fs::metadata(path.as_ref()).await.map(|m| m.is_file()).unwrap_or(false)
    }

    /// Size in bytes, `None` when the file is missing
    pub async fn size(&self, path: impl AsRef<Path>) -> Option<u64> {
        fs::metadata(path.as_ref()).await.ok().filter(|m| m.is_file()).map(|m| m.len())
    }

    /// Paths of every stored image, sorted by name
    pub async fn list(&self) -> Result<Vec<PathBuf>, ImageStoreError> {
        self.ensure_dir().await?;

        let mut entries = fs::read_dir(&self.dir).await?;
        let mut images = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_file() {
                images.push(entry.path());
            }
        }
        images.sort();
        Ok(images)
    }

    /// Total bytes used by stored images
    pub async fn storage_size(&self) -> Result<u64, ImageStoreError> {
        let mut total = 0;
        for path in self.list().await? {
            total += self.size(&path).await.unwrap_or(0);
        }
        Ok(total)
    }

    /// Delete images last modified more than `days` ago; returns how many were removed
    pub async fn cleanup_older_than(&self, days: u64) -> Result<usize, ImageStoreError> {
        let cutoff = SystemTime::now()
            .checked_sub(Duration::from_secs(days * 24 * 60 * 60))
            .unwrap_or(SystemTime::UNIX_EPOCH);

        let mut removed = 0;
        for path in self.list().await? {
            let modified = fs::metadata(&path).await?.modified()?;
            if modified < cutoff && self.delete(&path).await? {
                removed += 1;
            }
        }

        if removed > 0 {
            info!("Removed {} images older than {} days", removed, days);
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_copies_into_images_dir() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("capture.jpg");
        std::fs::write(&source, b"jpeg bytes").unwrap();

        let store = ImageStore::new(dir.path().join("data"));
        let saved = store.save(&source).await.unwrap();

        assert!(saved.starts_with(store.dir()));
        let name = saved.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("bp_") && name.ends_with(".jpg"));
        assert!(store.exists(&saved).await);
        assert_eq!(store.size(&saved).await, Some(10));
        assert!(source.exists());
    }

    #[tokio::test]
    async fn test_list_and_delete() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("capture.jpg");
        std::fs::write(&source, b"abc").unwrap();
        let store = ImageStore::new(dir.path());

        let first = store.save(&source).await.unwrap();
        let second = store.save(&source).await.unwrap();
        assert_ne!(first, second);
        assert_eq!(store.list().await.unwrap().len(), 2);
        assert_eq!(store.storage_size().await.unwrap(), 6);

        assert!(store.delete(&first).await.unwrap());
        assert!(!store.delete(&first).await.unwrap());
        assert_eq!(store.list().await.unwrap(), vec![second]);
    }

    #[tokio::test]
    async fn test_save_missing_source_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path());
        let err = store.save(dir.path().join("nope.jpg")).await.unwrap_err();
        assert!(matches!(err, ImageStoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_cleanup_keeps_recent_images() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("capture.jpg");
        std::fs::write(&source, b"abc").unwrap();
        let store = ImageStore::new(dir.path());
        store.save(&source).await.unwrap();

        assert_eq!(store.cleanup_older_than(90).await.unwrap(), 0);
        assert_eq!(store.list().await.unwrap().len(), 1);
    }
}
