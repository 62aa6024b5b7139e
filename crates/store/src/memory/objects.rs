//! Object storage held in memory.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::models::media::{MediaUpload, ObjectPath};
use crate::ports::ObjectStorage;

/// URL scheme of objects served by [`MemoryObjectStorage`].
pub const MEMORY_URL_SCHEME: &str = "memory://";

#[derive(Debug, Clone)]
struct StoredObject {
    upload: MediaUpload,
    generation: u64,
}

/// Objects keyed by path. Every write gets a new generation number which is
/// part of the returned URL, so a URL stops resolving once its object is
/// overwritten or deleted.
#[derive(Debug, Default)]
pub struct MemoryObjectStorage {
    objects: RwLock<HashMap<ObjectPath, StoredObject>>,
    generation: AtomicU64,
}

impl MemoryObjectStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn url_for(path: &ObjectPath, generation: u64) -> String {
        format!("{MEMORY_URL_SCHEME}{path}?generation={generation}")
    }

    /// Retrieve the bytes a URL returned by [`ObjectStorage::put`] points at.
    pub async fn fetch(&self, url: &str) -> Option<MediaUpload> {
        let rest = url.strip_prefix(MEMORY_URL_SCHEME)?;
        let (path, generation) = rest.split_once("?generation=")?;
        let generation: u64 = generation.parse().ok()?;
        let objects = self.objects.read().await;
        objects
            .iter()
            .find(|(p, o)| p.as_str() == path && o.generation == generation)
            .map(|(_, o)| o.upload.clone())
    }

    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }
}

#[async_trait]
impl ObjectStorage for MemoryObjectStorage {
    async fn put(&self, path: &ObjectPath, upload: MediaUpload) -> Result<String, StoreError> {
        let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
        self.objects
            .write()
            .await
            .insert(path.clone(), StoredObject { upload, generation });
        Ok(Self::url_for(path, generation))
    }

    async fn delete(&self, path: &ObjectPath) -> Result<(), StoreError> {
        self.objects
            .write()
            .await
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found("objects", path))
    }

    async fn url(&self, path: &ObjectPath) -> Result<Option<String>, StoreError> {
        Ok(self
            .objects
            .read()
            .await
            .get(path)
            .map(|o| Self::url_for(path, o.generation)))
    }
}
