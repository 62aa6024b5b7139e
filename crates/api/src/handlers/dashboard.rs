//! Role-specific dashboard.

use axum::extract::State;
use axum::Json;
use coursehub_core::roles::Role;
use coursehub_core::stats::{InstructorStats, StudentStats};
use coursehub_store::models::course::Course;
use coursehub_store::repositories::EnrolledCourse;
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// Admins see their own courses, students their enrollments.
#[derive(Debug, Serialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Dashboard {
    Admin {
        stats: InstructorStats,
        courses: Vec<Course>,
    },
    Student {
        stats: StudentStats,
        enrollments: Vec<EnrolledCourse>,
    },
}

/// GET /api/v1/dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> AppResult<Json<DataResponse<Dashboard>>> {
    let data = match user.role() {
        Some(Role::Admin) => {
            let courses = state.courses.list_by_instructor(user.uid()).await?;
            Dashboard::Admin {
                stats: InstructorStats::from_courses(courses.iter().map(Course::summary)),
                courses,
            }
        }
        _ => {
            let enrollments = state.courses.list_enrolled_courses(user.uid()).await?;
            Dashboard::Student {
                stats: StudentStats::from_enrollments(
                    enrollments.iter().map(|e| e.enrollment.summary()),
                ),
                enrollments,
            }
        }
    };
    Ok(Json(DataResponse { data }))
}
