//! Session/auth context: the current identity and profile, and the flows
//! that change them.
//!
//! State is published on a [`tokio::sync::watch`] channel. It starts as
//! [`SessionState::Loading`] and every transition (initial resolution,
//! signup, login, logout, profile edits) replaces it and wakes subscribers.

use std::sync::Arc;

use coursehub_core::authorization::{authorize, AccessDecision, Requirement};
use coursehub_core::error::CoreError;
use coursehub_core::roles::Role;
use coursehub_core::types::EntityId;
use mockable::Clock;
use tokio::sync::watch;
use validator::Validate;

use crate::error::RepositoryError;
use crate::models::identity::{Identity, IdentityUpdate, LoginForm, SignupForm};
use crate::models::media::{MediaUpload, ObjectPath};
use crate::models::profile::{ProfilePatch, ProfileUpdate, UserProfile};
use crate::ports::{IdentityStore, ObjectStorage, ProfileStore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Initial resolution has not completed; dependents must not render.
    Loading,
    SignedOut,
    SignedIn {
        identity: Identity,
        /// `None` when the identity has no profile document yet.
        profile: Option<UserProfile>,
    },
}

impl SessionState {
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::SignedIn { identity, .. } => Some(identity),
            _ => None,
        }
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        match self {
            Self::SignedIn { profile, .. } => profile.as_ref(),
            _ => None,
        }
    }
}

/// The stores a [`SessionContext`] is built from. Cheap to clone.
#[derive(Clone)]
pub struct SessionStores {
    pub identities: Arc<dyn IdentityStore>,
    pub profiles: Arc<dyn ProfileStore>,
    pub objects: Arc<dyn ObjectStorage>,
    pub clock: Arc<dyn Clock>,
}

pub struct SessionContext {
    stores: SessionStores,
    state: watch::Sender<SessionState>,
}

impl SessionContext {
    pub fn new(stores: SessionStores) -> Self {
        let (state, _) = watch::channel(SessionState::Loading);
        Self { stores, state }
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        matches!(*self.state.borrow(), SessionState::Loading)
    }

    pub fn current_identity(&self) -> Option<Identity> {
        self.state.borrow().identity().cloned()
    }

    pub fn current_profile(&self) -> Option<UserProfile> {
        self.state.borrow().profile().cloned()
    }

    pub fn role(&self) -> Option<Role> {
        self.state.borrow().profile().map(|p| p.role)
    }

    /// Evaluate the authorization gate against the current state.
    pub fn authorize(&self, required: Requirement) -> AccessDecision {
        let state = self.state.borrow();
        authorize(
            state.identity().map(|i| i.uid),
            state.profile().map(|p| p.role),
            required,
        )
    }

    /// Finish the initial resolution from a restored identity id (if any).
    /// An id the identity store no longer knows resolves to signed out.
    pub async fn resolve(&self, restored: Option<EntityId>) -> Result<(), RepositoryError> {
        let identity = match restored {
            Some(uid) => self.stores.identities.find(uid).await?,
            None => None,
        };
        match identity {
            Some(identity) => self.enter(identity).await,
            None => {
                self.publish(SessionState::SignedOut);
                Ok(())
            }
        }
    }

    /// Register an account, set its display name and write a `student`
    /// profile. The new account is signed in.
    pub async fn signup(&self, form: &SignupForm) -> Result<Identity, RepositoryError> {
        form.validate()
            .map_err(|e| CoreError::Validation(e.to_string()))?;

        let created = self
            .stores
            .identities
            .create_account(&form.email, &form.password)
            .await?;
        let identity = self
            .stores
            .identities
            .update_identity(
                created.uid,
                IdentityUpdate {
                    display_name: Some(form.display_name.clone()),
                    photo_url: None,
                },
            )
            .await?;

        let profile = self
            .stores
            .profiles
            .merge(
                identity.uid,
                ProfilePatch {
                    email: Some(identity.email.clone()),
                    display_name: identity.display_name.clone(),
                    photo_url: None,
                    role: Some(Role::Student),
                    created_at: Some(self.stores.clock.utc()),
                },
            )
            .await?;

        tracing::info!(uid = %identity.uid, "Account created");
        self.publish(SessionState::SignedIn {
            identity: identity.clone(),
            profile: Some(profile),
        });
        Ok(identity)
    }

    pub async fn login(&self, form: &LoginForm) -> Result<Identity, RepositoryError> {
        form.validate()
            .map_err(|e| CoreError::Validation(e.to_string()))?;
        let identity = self
            .stores
            .identities
            .sign_in(&form.email, &form.password)
            .await?;
        tracing::info!(uid = %identity.uid, "Signed in");
        self.enter(identity.clone()).await?;
        Ok(identity)
    }

    /// Sign out every session of the current identity. Signed-out callers
    /// are left as they are.
    pub async fn logout(&self) -> Result<(), RepositoryError> {
        if let Some(identity) = self.current_identity() {
            self.stores.identities.sign_out(identity.uid).await?;
            tracing::info!(uid = %identity.uid, "Signed out");
        }
        self.publish(SessionState::SignedOut);
        Ok(())
    }

    /// Merge display name / photo URL into the profile, mirroring them onto
    /// the identity. The role is not editable here.
    pub async fn update_profile(
        &self,
        update: &ProfileUpdate,
    ) -> Result<UserProfile, RepositoryError> {
        update
            .validate()
            .map_err(|e| CoreError::Validation(e.to_string()))?;
        self.apply_profile_change(IdentityUpdate {
            display_name: update.display_name.clone(),
            photo_url: update.photo_url.clone(),
        })
        .await
    }

    /// Store a profile photo at `users/{uid}/profile` and point the profile
    /// at it. Returns the photo URL.
    pub async fn upload_profile_photo(
        &self,
        upload: MediaUpload,
    ) -> Result<String, RepositoryError> {
        let identity = self.require_identity()?;
        let url = self
            .stores
            .objects
            .put(&ObjectPath::profile_photo(identity.uid), upload)
            .await?;
        self.apply_profile_change(IdentityUpdate {
            display_name: None,
            photo_url: Some(url.clone()),
        })
        .await?;
        Ok(url)
    }

    async fn apply_profile_change(
        &self,
        change: IdentityUpdate,
    ) -> Result<UserProfile, RepositoryError> {
        let mut identity = self.require_identity()?;
        if !change.is_empty() {
            identity = self
                .stores
                .identities
                .update_identity(identity.uid, change.clone())
                .await?;
        }

        let profile = self
            .stores
            .profiles
            .merge(
                identity.uid,
                ProfilePatch {
                    display_name: change.display_name,
                    photo_url: change.photo_url,
                    ..ProfilePatch::default()
                },
            )
            .await?;

        tracing::info!(uid = %identity.uid, "Profile updated");
        self.publish(SessionState::SignedIn {
            identity,
            profile: Some(profile.clone()),
        });
        Ok(profile)
    }

    async fn enter(&self, identity: Identity) -> Result<(), RepositoryError> {
        let profile = self.stores.profiles.get(identity.uid).await?;
        if profile.is_none() {
            tracing::warn!(uid = %identity.uid, "Signed-in identity has no profile document");
        }
        self.publish(SessionState::SignedIn { identity, profile });
        Ok(())
    }

    fn require_identity(&self) -> Result<Identity, RepositoryError> {
        self.current_identity()
            .ok_or_else(|| CoreError::Unauthorized("Not signed in".into()).into())
    }

    fn publish(&self, next: SessionState) {
        self.state.send_replace(next);
    }
}
