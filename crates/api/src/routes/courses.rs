//! Route definitions for the student-facing course catalogue.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{courses, enrollments};
use crate::state::AppState;

/// Routes mounted at `/courses`.
///
/// ```text
/// GET    /              -> list (?search=)
/// GET    /{id}          -> get_by_id
/// POST   /{id}/enroll   -> enroll
/// DELETE /{id}/enroll   -> unenroll
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(courses::list))
        .route("/{id}", get(courses::get_by_id))
        .route(
            "/{id}/enroll",
            post(courses::enroll).delete(courses::unenroll),
        )
}

/// Routes mounted at `/enrollments`.
///
/// ```text
/// GET /me  -> list_mine
/// ```
pub fn enrollments_router() -> Router<AppState> {
    Router::new().route("/me", get(enrollments::list_mine))
}
