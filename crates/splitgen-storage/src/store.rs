//! Blob store abstraction.

use async_trait::async_trait;
use std::path::Path;
use tracing::debug;

use crate::addressing::key_from_url;
use crate::error::{StorageError, StorageResult};

/// Content type for uploaded variants.
pub const CONTENT_TYPE_MP4: &str = "video/mp4";
/// Content type for uploaded archives.
pub const CONTENT_TYPE_ZIP: &str = "application/zip";

/// Key/value blob storage with publicly addressable objects.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Bucket objects are stored in.
    fn bucket(&self) -> &str;

    /// Public URL of `key`.
    fn object_url(&self, key: &str) -> String;

    /// Upload bytes as a publicly readable object, returning its URL.
    async fn upload_bytes(
        &self,
        data: Vec<u8>,
        key: &str,
        content_type: &str,
    ) -> StorageResult<String>;

    /// Fetch an object's bytes.
    async fn get_object(&self, key: &str) -> StorageResult<Vec<u8>>;

    /// Upload a local file as a publicly readable object, returning its URL.
    async fn upload_file(
        &self,
        path: &Path,
        key: &str,
        content_type: &str,
    ) -> StorageResult<String> {
        let data = tokio::fs::read(path).await?;
        self.upload_bytes(data, key, content_type).await
    }

    /// Download an object to a local file, creating parent directories.
    async fn download_file(&self, key: &str, path: &Path) -> StorageResult<()> {
        debug!("Downloading {} to {}", key, path.display());

        let bytes = self.get_object(key).await?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::download_failed(format!("Failed to create directory: {}", e))
            })?;
        }

        tokio::fs::write(path, bytes)
            .await
            .map_err(|e| StorageError::download_failed(format!("Failed to write file: {}", e)))?;

        Ok(())
    }

    /// Fetch the object a public URL points at.
    async fn get_object_by_url(&self, url: &str) -> StorageResult<Vec<u8>> {
        let key = key_from_url(url)?;
        self.get_object(&key).await
    }
}
