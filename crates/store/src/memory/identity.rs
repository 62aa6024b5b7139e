//! Password identity provider held in memory.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use coursehub_core::types::EntityId;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::models::identity::{Identity, IdentityUpdate};
use crate::password::{hash_password, validate_password_strength, verify_password};
use crate::ports::IdentityStore;

#[derive(Debug, Clone)]
struct Account {
    identity: Identity,
    password_hash: String,
}

#[derive(Debug, Default)]
pub struct MemoryIdentityStore {
    accounts: RwLock<HashMap<EntityId, Account>>,
}

impl MemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[async_trait]
impl IdentityStore for MemoryIdentityStore {
    async fn create_account(&self, email: &str, password: &str) -> Result<Identity, StoreError> {
        validate_password_strength(password)?;
        let email = normalize_email(email);
        let password_hash = hash_password(password)?;

        let mut accounts = self.accounts.write().await;
        if accounts.values().any(|a| a.identity.email == email) {
            return Err(StoreError::Conflict(format!(
                "An account already exists for {email}"
            )));
        }
        let identity = Identity {
            uid: EntityId::now_v7(),
            email,
            display_name: None,
            photo_url: None,
            session_version: 0,
            created_at: Utc::now(),
        };
        accounts.insert(
            identity.uid,
            Account {
                identity: identity.clone(),
                password_hash,
            },
        );
        Ok(identity)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, StoreError> {
        let email = normalize_email(email);
        let account = self
            .accounts
            .read()
            .await
            .values()
            .find(|a| a.identity.email == email)
            .cloned()
            .ok_or(StoreError::InvalidCredentials)?;
        if !verify_password(password, &account.password_hash)? {
            return Err(StoreError::InvalidCredentials);
        }
        Ok(account.identity)
    }

    async fn sign_out(&self, uid: EntityId) -> Result<(), StoreError> {
        let mut accounts = self.accounts.write().await;
        let account = accounts
            .get_mut(&uid)
            .ok_or_else(|| StoreError::not_found("identities", uid))?;
        account.identity.session_version += 1;
        Ok(())
    }

    async fn update_identity(
        &self,
        uid: EntityId,
        update: IdentityUpdate,
    ) -> Result<Identity, StoreError> {
        let mut accounts = self.accounts.write().await;
        let account = accounts
            .get_mut(&uid)
            .ok_or_else(|| StoreError::not_found("identities", uid))?;
        if update.display_name.is_some() {
            account.identity.display_name = update.display_name;
        }
        if update.photo_url.is_some() {
            account.identity.photo_url = update.photo_url;
        }
        Ok(account.identity.clone())
    }

    async fn find(&self, uid: EntityId) -> Result<Option<Identity>, StoreError> {
        Ok(self
            .accounts
            .read()
            .await
            .get(&uid)
            .map(|a| a.identity.clone()))
    }
}
