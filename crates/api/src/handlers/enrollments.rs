//! Handlers for the caller's enrollments.

use axum::extract::State;
use axum::Json;
use coursehub_store::repositories::EnrolledCourse;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/enrollments/me
///
/// The caller's enrollments joined with their courses, newest first.
pub async fn list_mine(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> AppResult<Json<DataResponse<Vec<EnrolledCourse>>>> {
    let enrolled = state.courses.list_enrolled_courses(user.uid()).await?;
    Ok(Json(DataResponse { data: enrolled }))
}
