pub mod admin;
pub mod auth;
pub mod courses;
pub mod health;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// `upload_limit` caps the raw media upload bodies.
///
/// Route hierarchy:
///
/// ```text
/// /auth/signup                 signup (public)
/// /auth/login                  login (public)
/// /auth/logout                 logout (requires auth)
/// /auth/me                     current session
/// /auth/profile                update own profile
/// /auth/profile/photo          upload profile photo
///
/// /courses                     list (?search=)
/// /courses/{id}                get
/// /courses/{id}/enroll         enroll (POST), unenroll (DELETE)
///
/// /enrollments/me              caller's enrolled courses
///
/// /dashboard                   role-specific dashboard
///
/// /navigation                  gate decision for a client path (public)
///
/// /admin/courses               list own, create (admin only)
/// /admin/courses/{id}          update, delete
/// /admin/courses/{id}/image    upload image (PUT)
/// /admin/courses/{id}/video    upload video (PUT)
/// ```
pub fn api_routes(upload_limit: usize) -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router(upload_limit))
        .nest("/courses", courses::router())
        .nest("/enrollments", courses::enrollments_router())
        .route("/dashboard", get(handlers::dashboard::dashboard))
        .route("/navigation", get(handlers::navigation::navigate))
        .nest("/admin/courses", admin::router(upload_limit))
}
