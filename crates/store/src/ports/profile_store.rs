//! Port for the `users` profile collection.

use async_trait::async_trait;
use coursehub_core::types::EntityId;

use crate::error::StoreError;
use crate::models::profile::{ProfilePatch, UserProfile};

#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Fetch the profile keyed by identity id.
    async fn get(&self, uid: EntityId) -> Result<Option<UserProfile>, StoreError>;

    /// Merge-upsert: create the document if missing, then overwrite the
    /// fields present in `patch`. Returns the stored document.
    async fn merge(&self, uid: EntityId, patch: ProfilePatch) -> Result<UserProfile, StoreError>;
}
