//! Authenticated principal returned by the identity store.

use coursehub_core::types::{EntityId, Timestamp};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// An authenticated end-user principal, independent of role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub uid: EntityId,
    pub email: String,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
    /// Bumped on sign-out; tokens minted for an older version are stale.
    pub session_version: i32,
    pub created_at: Timestamp,
}

/// Changes to the identity's own display metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityUpdate {
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
}

impl IdentityUpdate {
    pub fn is_empty(&self) -> bool {
        self.display_name.is_none() && self.photo_url.is_none()
    }
}

/// Account registration form.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignupForm {
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    pub display_name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords don't match"))]
    pub confirm_password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginForm {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}
