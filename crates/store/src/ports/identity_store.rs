//! Port for the identity provider.

use async_trait::async_trait;
use coursehub_core::types::EntityId;

use crate::error::StoreError;
use crate::models::identity::{Identity, IdentityUpdate};

/// Password-based identity provider.
///
/// Credentials never leave the adapter: callers pass the plaintext password
/// and get back an [`Identity`] or [`StoreError::InvalidCredentials`].
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Register a new account. Fails with [`StoreError::Conflict`] when the
    /// email is taken.
    async fn create_account(&self, email: &str, password: &str) -> Result<Identity, StoreError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, StoreError>;

    /// End every session of `uid` by bumping its session version.
    async fn sign_out(&self, uid: EntityId) -> Result<(), StoreError>;

    async fn update_identity(
        &self,
        uid: EntityId,
        update: IdentityUpdate,
    ) -> Result<Identity, StoreError>;

    /// Look up an identity, e.g. to restore a session at startup.
    async fn find(&self, uid: EntityId) -> Result<Option<Identity>, StoreError>;
}
