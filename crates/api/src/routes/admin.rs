//! Route definitions for admin course management.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, put};
use axum::Router;

use crate::handlers::admin_courses;
use crate::state::AppState;

/// Routes mounted at `/admin/courses`. All require the admin role.
///
/// The media routes accept bodies up to `upload_limit` bytes instead of
/// axum's 2 MB default.
///
/// ```text
/// GET    /             -> list_own (?search=)
/// POST   /             -> create
/// PUT    /{id}         -> update
/// DELETE /{id}         -> delete
/// PUT    /{id}/image   -> upload_image
/// PUT    /{id}/video   -> upload_video
/// ```
pub fn router(upload_limit: usize) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(admin_courses::list_own).post(admin_courses::create),
        )
        .route(
            "/{id}",
            put(admin_courses::update).delete(admin_courses::delete),
        )
        .route(
            "/{id}/image",
            put(admin_courses::upload_image).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route(
            "/{id}/video",
            put(admin_courses::upload_video).layer(DefaultBodyLimit::max(upload_limit)),
        )
}
