//! Handlers for the `/auth` resource (signup, login, logout, profile).

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::Json;
use coursehub_core::error::CoreError;
use coursehub_store::models::identity::{Identity, LoginForm, SignupForm};
use coursehub_store::models::media::MediaUpload;
use coursehub_store::models::profile::{ProfileUpdate, UserProfile};
use coursehub_store::session::SessionContext;
use serde::Serialize;

use crate::auth::jwt::generate_access_token;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Successful authentication response returned by signup and login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: SessionView,
}

/// The current identity with its profile.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub identity: Identity,
    pub profile: Option<UserProfile>,
}

#[derive(Debug, Serialize)]
pub struct UploadedMedia {
    pub url: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/signup
///
/// Register a student account and sign it in.
pub async fn signup(
    State(state): State<AppState>,
    Json(input): Json<SignupForm>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let session = state.session();
    session.signup(&input).await?;
    let response = auth_response(&state, &session)?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginForm>,
) -> AppResult<Json<AuthResponse>> {
    let session = state.session();
    session.login(&input).await?;
    Ok(Json(auth_response(&state, &session)?))
}

/// POST /api/v1/auth/logout
///
/// End every session of the caller. Returns 204 No Content.
pub async fn logout(RequireAuth(user): RequireAuth) -> AppResult<StatusCode> {
    user.session.logout().await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/auth/me
pub async fn me(RequireAuth(user): RequireAuth) -> Json<DataResponse<SessionView>> {
    Json(DataResponse {
        data: SessionView {
            identity: user.identity,
            profile: user.profile,
        },
    })
}

/// PUT /api/v1/auth/profile
pub async fn update_profile(
    RequireAuth(user): RequireAuth,
    Json(input): Json<ProfileUpdate>,
) -> AppResult<Json<DataResponse<UserProfile>>> {
    let profile = user.session.update_profile(&input).await?;
    Ok(Json(DataResponse { data: profile }))
}

/// POST /api/v1/auth/profile/photo
///
/// The raw request body is the photo; its `Content-Type` is kept.
pub async fn upload_photo(
    RequireAuth(user): RequireAuth,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Json<DataResponse<UploadedMedia>>> {
    let upload = media_upload(&headers, body)?;
    let url = user.session.upload_profile_photo(upload).await?;
    Ok(Json(DataResponse {
        data: UploadedMedia { url },
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Build a [`MediaUpload`] from a raw request body. Empty bodies are rejected.
pub(crate) fn media_upload(headers: &HeaderMap, body: Bytes) -> AppResult<MediaUpload> {
    if body.is_empty() {
        return Err(AppError::BadRequest("Request body must contain the file".into()));
    }
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());
    Ok(MediaUpload::new(body.to_vec(), content_type))
}

fn auth_response(state: &AppState, session: &SessionContext) -> AppResult<AuthResponse> {
    let identity = session
        .current_identity()
        .ok_or_else(|| CoreError::Internal("Session did not sign in".into()))?;
    let profile = session.current_profile();
    let role = profile.as_ref().map(|p| p.role).unwrap_or_default();

    let access_token = generate_access_token(&identity, role, &state.config.jwt)
        .map_err(|e| CoreError::Internal(format!("Token generation error: {e}")))?;

    Ok(AuthResponse {
        access_token,
        expires_in: state.config.jwt.access_token_expiry_mins * 60,
        user: SessionView { identity, profile },
    })
}
