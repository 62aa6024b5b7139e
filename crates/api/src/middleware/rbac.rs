//! Authorization gate extractors.
//!
//! Each extractor resolves an [`AuthUser`] and evaluates
//! [`authorize`] for its requirement. A redirect to login becomes
//! 401 Unauthorized, any other redirect 403 Forbidden.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use coursehub_core::authorization::{authorize, AccessDecision, AppRoute, Requirement};
use coursehub_core::error::CoreError;
use coursehub_core::roles::Role;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Apply the gate to an authenticated caller.
pub fn enforce(user: &AuthUser, required: Requirement) -> Result<(), AppError> {
    match authorize(Some(user.uid()), user.role(), required) {
        AccessDecision::Allow => Ok(()),
        AccessDecision::RedirectTo(AppRoute::Login) => Err(AppError::Core(
            CoreError::Unauthorized("Sign in required".into()),
        )),
        AccessDecision::RedirectTo(_) => Err(AppError::Core(CoreError::Forbidden(
            "Admin role required".into(),
        ))),
    }
}

/// Requires the `admin` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(user): RequireAdmin) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        enforce(&user, Requirement::Role(Role::Admin))?;
        Ok(RequireAdmin(user))
    }
}

/// Requires any signed-in identity, whatever its role.
pub struct RequireAuth(pub AuthUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        enforce(&user, Requirement::Authenticated)?;
        Ok(RequireAuth(user))
    }
}
