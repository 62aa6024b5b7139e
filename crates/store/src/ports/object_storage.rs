//! Port for binary object storage.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::models::media::{MediaUpload, ObjectPath};

/// Write-then-read-URL object storage.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store `upload` at `path`, replacing any previous object there, and
    /// return a URL the stored bytes can be retrieved from.
    async fn put(&self, path: &ObjectPath, upload: MediaUpload) -> Result<String, StoreError>;

    /// Delete the object at `path`. Fails with [`StoreError::NotFound`] when
    /// nothing is stored there.
    async fn delete(&self, path: &ObjectPath) -> Result<(), StoreError>;

    /// Retrievable URL of the object currently at `path`, if any.
    async fn url(&self, path: &ObjectPath) -> Result<Option<String>, StoreError>;
}
