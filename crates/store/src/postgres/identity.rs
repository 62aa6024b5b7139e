//! `identities` table: email/password accounts.

use async_trait::async_trait;
use coursehub_core::types::EntityId;
use sqlx::FromRow;

use super::rows::{IdentityRow, IDENTITY_COLUMNS};
use super::DbPool;
use crate::error::StoreError;
use crate::models::identity::{Identity, IdentityUpdate};
use crate::password::{hash_password, validate_password_strength, verify_password};
use crate::ports::IdentityStore;

#[derive(Debug, Clone)]
pub struct PgIdentityStore {
    pool: DbPool,
}

impl PgIdentityStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct CredentialRow {
    #[sqlx(flatten)]
    identity: IdentityRow,
    password_hash: String,
}

#[async_trait]
impl IdentityStore for PgIdentityStore {
    async fn create_account(&self, email: &str, password: &str) -> Result<Identity, StoreError> {
        validate_password_strength(password)?;
        let email = email.trim().to_lowercase();
        let password_hash = hash_password(password)?;

        let query = format!(
            "INSERT INTO identities (uid, email, password_hash)
             VALUES ($1, $2, $3)
             RETURNING {IDENTITY_COLUMNS}"
        );
        let row = sqlx::query_as::<_, IdentityRow>(&query)
            .bind(EntityId::now_v7())
            .bind(&email)
            .bind(&password_hash)
            .fetch_one(&self.pool)
            .await
            .map_err(|err| match StoreError::from(err) {
                StoreError::Conflict(_) => {
                    StoreError::Conflict(format!("An account already exists for {email}"))
                }
                other => other,
            })?;
        Ok(row.into())
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, StoreError> {
        let query = format!(
            "SELECT {IDENTITY_COLUMNS}, password_hash FROM identities
             WHERE lower(email) = lower($1)"
        );
        let row = sqlx::query_as::<_, CredentialRow>(&query)
            .bind(email.trim())
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::InvalidCredentials)?;
        if !verify_password(password, &row.password_hash)? {
            return Err(StoreError::InvalidCredentials);
        }
        Ok(row.identity.into())
    }

    async fn sign_out(&self, uid: EntityId) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE identities SET session_version = session_version + 1 WHERE uid = $1",
        )
        .bind(uid)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("identities", uid));
        }
        Ok(())
    }

    async fn update_identity(
        &self,
        uid: EntityId,
        update: IdentityUpdate,
    ) -> Result<Identity, StoreError> {
        let query = format!(
            "UPDATE identities SET
                display_name = COALESCE($2, display_name),
                photo_url = COALESCE($3, photo_url)
             WHERE uid = $1
             RETURNING {IDENTITY_COLUMNS}"
        );
        sqlx::query_as::<_, IdentityRow>(&query)
            .bind(uid)
            .bind(&update.display_name)
            .bind(&update.photo_url)
            .fetch_optional(&self.pool)
            .await?
            .map(Identity::from)
            .ok_or_else(|| StoreError::not_found("identities", uid))
    }

    async fn find(&self, uid: EntityId) -> Result<Option<Identity>, StoreError> {
        let query = format!("SELECT {IDENTITY_COLUMNS} FROM identities WHERE uid = $1");
        Ok(sqlx::query_as::<_, IdentityRow>(&query)
            .bind(uid)
            .fetch_optional(&self.pool)
            .await?
            .map(Identity::from))
    }
}
