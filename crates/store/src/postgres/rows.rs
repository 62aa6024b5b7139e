//! Row types and their conversion into domain models.

use coursehub_core::course::CourseLevel;
use coursehub_core::roles::Role;
use coursehub_core::types::{CalendarDate, EntityId, Timestamp};
use sqlx::FromRow;

use crate::error::StoreError;
use crate::models::course::Course;
use crate::models::enrollment::Enrollment;
use crate::models::identity::Identity;
use crate::models::profile::UserProfile;

pub(crate) const COURSE_COLUMNS: &str = "id, title, description, instructor, duration, level, \
    category, price, max_students, start_date, end_date, materials, image_url, video_url, \
    enrolled_students, is_active, created_by, created_at, updated_at";

pub(crate) const ENROLLMENT_COLUMNS: &str =
    "id, user_id, course_id, enrolled_at, progress, completed";

pub(crate) const PROFILE_COLUMNS: &str = "uid, email, display_name, photo_url, role, created_at";

pub(crate) const IDENTITY_COLUMNS: &str =
    "uid, email, display_name, photo_url, session_version, created_at";

#[derive(Debug, FromRow)]
pub(crate) struct CourseRow {
    pub id: EntityId,
    pub title: String,
    pub description: String,
    pub instructor: String,
    pub duration: String,
    pub level: String,
    pub category: String,
    pub price: f64,
    pub max_students: i32,
    pub start_date: CalendarDate,
    pub end_date: CalendarDate,
    pub materials: Vec<String>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub enrolled_students: Vec<EntityId>,
    pub is_active: bool,
    pub created_by: EntityId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<CourseRow> for Course {
    type Error = StoreError;

    fn try_from(row: CourseRow) -> Result<Self, Self::Error> {
        let level = CourseLevel::from_name(&row.level)
            .map_err(|e| StoreError::Backend(format!("course {}: {e}", row.id)))?;
        let max_students = u32::try_from(row.max_students).map_err(|_| {
            StoreError::Backend(format!(
                "course {}: negative max_students {}",
                row.id, row.max_students
            ))
        })?;
        Ok(Course {
            id: row.id,
            title: row.title,
            description: row.description,
            instructor: row.instructor,
            duration: row.duration,
            level,
            category: row.category,
            price: row.price,
            max_students,
            start_date: row.start_date,
            end_date: row.end_date,
            materials: row.materials,
            image_url: row.image_url,
            video_url: row.video_url,
            enrolled_students: row.enrolled_students,
            is_active: row.is_active,
            created_by: row.created_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct EnrollmentRow {
    pub id: EntityId,
    pub user_id: EntityId,
    pub course_id: EntityId,
    pub enrolled_at: Timestamp,
    pub progress: i16,
    pub completed: bool,
}

impl TryFrom<EnrollmentRow> for Enrollment {
    type Error = StoreError;

    fn try_from(row: EnrollmentRow) -> Result<Self, Self::Error> {
        let progress = u8::try_from(row.progress)
            .ok()
            .filter(|p| *p <= 100)
            .ok_or_else(|| {
                StoreError::Backend(format!(
                    "enrollment {}: progress {} out of range",
                    row.id, row.progress
                ))
            })?;
        Ok(Enrollment {
            id: row.id,
            user_id: row.user_id,
            course_id: row.course_id,
            enrolled_at: row.enrolled_at,
            progress,
            completed: row.completed,
        })
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct ProfileRow {
    pub uid: EntityId,
    pub email: String,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
    pub role: String,
    pub created_at: Option<Timestamp>,
}

impl TryFrom<ProfileRow> for UserProfile {
    type Error = StoreError;

    fn try_from(row: ProfileRow) -> Result<Self, Self::Error> {
        let role = Role::from_name(&row.role)
            .map_err(|e| StoreError::Backend(format!("profile {}: {e}", row.uid)))?;
        Ok(UserProfile {
            uid: row.uid,
            email: row.email,
            display_name: row.display_name,
            photo_url: row.photo_url,
            role,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct IdentityRow {
    pub uid: EntityId,
    pub email: String,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
    pub session_version: i32,
    pub created_at: Timestamp,
}

impl From<IdentityRow> for Identity {
    fn from(row: IdentityRow) -> Self {
        Identity {
            uid: row.uid,
            email: row.email,
            display_name: row.display_name,
            photo_url: row.photo_url,
            session_version: row.session_version,
            created_at: row.created_at,
        }
    }
}
