//! Handlers for the admin `/admin/courses` resource.
//!
//! Admins manage the courses they created; another admin's course reads as
//! missing.

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use coursehub_core::error::CoreError;
use coursehub_core::types::EntityId;
use coursehub_store::models::course::{Course, CreateCourse, UpdateCourse};
use coursehub_store::repositories::DeletionReport;
use serde::Serialize;

use super::auth::{media_upload, UploadedMedia};
use super::courses::{load_course, SearchParams};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CreatedCourse {
    pub id: EntityId,
}

async fn load_owned(state: &AppState, user: &AuthUser, id: EntityId) -> AppResult<Course> {
    let course = load_course(state, id).await?;
    if course.created_by != user.uid() {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "course",
            id,
        }));
    }
    Ok(course)
}

/// GET /api/v1/admin/courses?search=
///
/// Courses created by the caller, newest first.
pub async fn list_own(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<DataResponse<Vec<Course>>>> {
    let courses = state.courses.list_by_instructor(user.uid()).await?;
    Ok(Json(DataResponse {
        data: params.filter(courses),
    }))
}

/// POST /api/v1/admin/courses
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    Json(input): Json<CreateCourse>,
) -> AppResult<(StatusCode, Json<DataResponse<CreatedCourse>>)> {
    let id = state.courses.create(&input, user.uid()).await?;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: CreatedCourse { id },
        }),
    ))
}

/// PUT /api/v1/admin/courses/{id}
///
/// Partial update: omitted fields are left untouched.
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    Path(id): Path<EntityId>,
    Json(input): Json<UpdateCourse>,
) -> AppResult<Json<DataResponse<Course>>> {
    load_owned(&state, &user, id).await?;
    let course = state.courses.update(id, &input).await?;
    Ok(Json(DataResponse { data: course }))
}

/// DELETE /api/v1/admin/courses/{id}
///
/// Cascades to the course media and enrollments.
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    Path(id): Path<EntityId>,
) -> AppResult<Json<DataResponse<DeletionReport>>> {
    load_owned(&state, &user, id).await?;
    let report = state.courses.delete(id).await?;
    Ok(Json(DataResponse { data: report }))
}

/// PUT /api/v1/admin/courses/{id}/image
pub async fn upload_image(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    Path(id): Path<EntityId>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Json<DataResponse<UploadedMedia>>> {
    load_owned(&state, &user, id).await?;
    let url = state
        .courses
        .upload_image(id, media_upload(&headers, body)?)
        .await?;
    Ok(Json(DataResponse {
        data: UploadedMedia { url },
    }))
}

/// PUT /api/v1/admin/courses/{id}/video
pub async fn upload_video(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    Path(id): Path<EntityId>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Json<DataResponse<UploadedMedia>>> {
    load_owned(&state, &user, id).await?;
    let url = state
        .courses
        .upload_video(id, media_upload(&headers, body)?)
        .await?;
    Ok(Json(DataResponse {
        data: UploadedMedia { url },
    }))
}
