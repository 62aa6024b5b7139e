//! User profile document model and DTOs.

use coursehub_core::roles::Role;
use coursehub_core::types::{EntityId, Timestamp};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A document from the `users` collection, keyed by identity id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub uid: EntityId,
    pub email: String,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
    pub role: Role,
    pub created_at: Option<Timestamp>,
}

impl UserProfile {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// The document a merge-upsert starts from when none exists yet.
    pub fn empty(uid: EntityId) -> Self {
        Self {
            uid,
            email: String::new(),
            display_name: None,
            photo_url: None,
            role: Role::Student,
            created_at: None,
        }
    }
}

/// Merge-upsert payload. `Some` fields overwrite; `None` fields keep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfilePatch {
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
    pub role: Option<Role>,
    pub created_at: Option<Timestamp>,
}

impl ProfilePatch {
    pub fn apply_to(&self, profile: &mut UserProfile) {
        if let Some(email) = &self.email {
            profile.email = email.clone();
        }
        if self.display_name.is_some() {
            profile.display_name = self.display_name.clone();
        }
        if self.photo_url.is_some() {
            profile.photo_url = self.photo_url.clone();
        }
        if let Some(role) = self.role {
            profile.role = role;
        }
        if self.created_at.is_some() {
            profile.created_at = self.created_at;
        }
    }
}

/// Self-service profile edit. Role is deliberately absent.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    pub display_name: Option<String>,
    #[validate(url(message = "Photo URL must be a valid URL"))]
    pub photo_url: Option<String>,
}
