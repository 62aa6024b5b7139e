//! Handlers for the student-facing `/courses` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use coursehub_core::error::CoreError;
use coursehub_core::types::EntityId;
use coursehub_store::models::course::Course;
use coursehub_store::models::enrollment::Enrollment;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for course listings.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    /// Case-insensitive match against title, description and category.
    pub search: Option<String>,
}

impl SearchParams {
    pub(crate) fn filter(&self, courses: Vec<Course>) -> Vec<Course> {
        match self.search.as_deref() {
            Some(term) => courses
                .into_iter()
                .filter(|c| c.matches_search(term))
                .collect(),
            None => courses,
        }
    }
}

pub(crate) async fn load_course(state: &AppState, id: EntityId) -> AppResult<Course> {
    state
        .courses
        .get_by_id(id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "course",
            id,
        }))
}

/// GET /api/v1/courses?search=
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<DataResponse<Vec<Course>>>> {
    let courses = params.filter(state.courses.list_all().await?);
    Ok(Json(DataResponse { data: courses }))
}

/// GET /api/v1/courses/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<EntityId>,
) -> AppResult<Json<DataResponse<Course>>> {
    let course = load_course(&state, id).await?;
    Ok(Json(DataResponse { data: course }))
}

/// POST /api/v1/courses/{id}/enroll
///
/// Enroll the caller. Owners cannot enroll in their own course and a full
/// course rejects new members with 409; repeating the call for an existing
/// member returns the existing enrollment.
pub async fn enroll(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<EntityId>,
) -> AppResult<(StatusCode, Json<DataResponse<Enrollment>>)> {
    let course = load_course(&state, id).await?;
    if course.created_by == user.uid() {
        return Err(AppError::Core(CoreError::Forbidden(
            "Instructors cannot enroll in their own course".into(),
        )));
    }
    if !course.is_enrolled(user.uid()) && !course.has_capacity() {
        return Err(AppError::Core(CoreError::Conflict("Course is full".into())));
    }

    let enrollment = state.courses.enroll(id, user.uid()).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: enrollment })))
}

/// DELETE /api/v1/courses/{id}/enroll
///
/// Unenroll the caller. Returns 204 No Content, also for non-members.
pub async fn unenroll(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<EntityId>,
) -> AppResult<StatusCode> {
    load_course(&state, id).await?;
    state.courses.unenroll(id, user.uid()).await?;
    Ok(StatusCode::NO_CONTENT)
}
