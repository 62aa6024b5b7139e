//! JWT-based session extractor for Axum handlers.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use coursehub_core::error::CoreError;
use coursehub_core::roles::Role;
use coursehub_core::types::EntityId;
use coursehub_store::models::identity::Identity;
use coursehub_store::models::profile::UserProfile;
use coursehub_store::session::SessionContext;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// The signed-in caller, resolved from a Bearer token.
///
/// Extraction validates the token, resolves a [`SessionContext`] for its
/// subject and rejects the request when the identity is gone or has signed
/// out since the token was issued.
#[derive(Clone)]
pub struct AuthUser {
    pub identity: Identity,
    pub profile: Option<UserProfile>,
    /// Resolved session; handlers run session operations through it.
    pub session: Arc<SessionContext>,
}

impl AuthUser {
    pub fn uid(&self) -> EntityId {
        self.identity.uid
    }

    /// Role from the stored profile; `None` when the profile is missing.
    pub fn role(&self) -> Option<Role> {
        self.profile.as_ref().map(|p| p.role)
    }
}

fn unauthorized(message: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(message.into()))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| unauthorized("Missing Authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| unauthorized("Invalid Authorization format. Expected: Bearer <token>"))?;

        let claims = validate_token(token, &state.config.jwt)
            .map_err(|_| unauthorized("Invalid or expired token"))?;

        let session = state.session();
        session.resolve(Some(claims.sub)).await?;

        let identity = session
            .current_identity()
            .ok_or_else(|| unauthorized("Account no longer exists"))?;
        if identity.session_version != claims.ver {
            tracing::debug!(uid = %identity.uid, "Rejected token from an ended session");
            return Err(unauthorized("Session has ended, please sign in again"));
        }

        Ok(AuthUser {
            profile: session.current_profile(),
            identity,
            session: Arc::new(session),
        })
    }
}

/// The caller if a valid session token was presented, otherwise `None`.
///
/// Never rejects: a missing, malformed or stale token reads as signed out.
pub struct MaybeAuthUser(pub Option<AuthUser>);

impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if !parts.headers.contains_key("authorization") {
            return Ok(MaybeAuthUser(None));
        }
        Ok(MaybeAuthUser(
            AuthUser::from_request_parts(parts, state).await.ok(),
        ))
    }
}
