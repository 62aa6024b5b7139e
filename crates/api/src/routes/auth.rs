//! Route definitions for the `/auth` resource.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST /signup         -> signup
/// POST /login          -> login
/// POST /logout         -> logout (requires auth)
/// GET  /me             -> me (requires auth)
/// PUT  /profile        -> update_profile (requires auth)
/// POST /profile/photo  -> upload_photo (requires auth, up to `upload_limit` bytes)
/// ```
pub fn router(upload_limit: usize) -> Router<AppState> {
    Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
        .route("/profile", put(auth::update_profile))
        .route(
            "/profile/photo",
            post(auth::upload_photo).layer(DefaultBodyLimit::max(upload_limit)),
        )
}
