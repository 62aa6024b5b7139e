//! Enrollment document model and DTOs.

use coursehub_core::stats::EnrollmentSummary;
use coursehub_core::types::{EntityId, Timestamp};
use serde::{Deserialize, Serialize};

/// A document from the `enrollments` collection: one student's membership
/// and progress in one course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    pub id: EntityId,
    pub user_id: EntityId,
    pub course_id: EntityId,
    pub enrolled_at: Timestamp,
    /// Percentage, 0 to 100.
    pub progress: u8,
    pub completed: bool,
}

impl Enrollment {
    pub fn summary(&self) -> EnrollmentSummary {
        EnrollmentSummary {
            progress: self.progress,
            completed: self.completed,
        }
    }
}

/// DTO for inserting an enrollment; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEnrollment {
    pub user_id: EntityId,
    pub course_id: EntityId,
    pub enrolled_at: Timestamp,
    pub progress: u8,
    pub completed: bool,
}

impl NewEnrollment {
    /// A fresh enrollment: no progress, not completed.
    pub fn started(user_id: EntityId, course_id: EntityId, enrolled_at: Timestamp) -> Self {
        Self {
            user_id,
            course_id,
            enrolled_at,
            progress: 0,
            completed: false,
        }
    }

    pub fn into_enrollment(self, id: EntityId) -> Enrollment {
        Enrollment {
            id,
            user_id: self.user_id,
            course_id: self.course_id,
            enrolled_at: self.enrolled_at,
            progress: self.progress,
            completed: self.completed,
        }
    }
}

/// Equality filters for listing enrollments. Results are newest first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrollmentQuery {
    pub user_id: Option<EntityId>,
    pub course_id: Option<EntityId>,
}

impl EnrollmentQuery {
    pub fn by_user(user_id: EntityId) -> Self {
        Self {
            user_id: Some(user_id),
            course_id: None,
        }
    }

    pub fn by_course(course_id: EntityId) -> Self {
        Self {
            user_id: None,
            course_id: Some(course_id),
        }
    }

    pub fn by_pair(user_id: EntityId, course_id: EntityId) -> Self {
        Self {
            user_id: Some(user_id),
            course_id: Some(course_id),
        }
    }

    pub fn matches(&self, enrollment: &Enrollment) -> bool {
        self.user_id.map_or(true, |u| u == enrollment.user_id)
            && self.course_id.map_or(true, |c| c == enrollment.course_id)
    }
}
