//! Course document model and DTOs.

use coursehub_core::course::{
    coerce_max_students, coerce_price, parse_calendar_date, parse_materials, CourseLevel,
    FormNumber,
};
use coursehub_core::error::CoreError;
use coursehub_core::stats::CourseSummary;
use coursehub_core::types::{CalendarDate, EntityId, Timestamp};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A document from the `courses` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: EntityId,
    pub title: String,
    pub description: String,
    pub instructor: String,
    pub duration: String,
    pub level: CourseLevel,
    pub category: String,
    pub price: f64,
    pub max_students: u32,
    pub start_date: CalendarDate,
    pub end_date: CalendarDate,
    pub materials: Vec<String>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    /// Identity ids of enrolled students. Never contains duplicates.
    pub enrolled_students: Vec<EntityId>,
    pub is_active: bool,
    pub created_by: EntityId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Course {
    pub fn is_enrolled(&self, user_id: EntityId) -> bool {
        coursehub_core::course::is_member(&self.enrolled_students, user_id)
    }

    /// Advisory capacity check; the store never enforces it.
    pub fn has_capacity(&self) -> bool {
        coursehub_core::course::has_capacity(self.enrolled_students.len(), self.max_students)
    }

    pub fn matches_search(&self, term: &str) -> bool {
        coursehub_core::course::matches_search(
            term,
            &[&self.title, &self.description, &self.category],
        )
    }

    pub fn summary(&self) -> CourseSummary {
        CourseSummary {
            enrolled: self.enrolled_students.len(),
            is_active: self.is_active,
        }
    }
}

/// Course form input for creating a course.
///
/// Numbers may arrive as strings and dates as `YYYY-MM-DD` strings; see
/// [`CreateCourse::to_document`] for the coercions.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourse {
    #[validate(length(min = 3, message = "Title must be at least 3 characters"))]
    pub title: String,
    #[validate(length(min = 10, message = "Description must be at least 10 characters"))]
    pub description: String,
    #[validate(length(min = 2, message = "Instructor name is required"))]
    pub instructor: String,
    #[validate(length(min = 1, message = "Duration is required"))]
    pub duration: String,
    pub level: CourseLevel,
    #[validate(length(min = 2, message = "Category is required"))]
    pub category: String,
    pub price: FormNumber,
    pub max_students: FormNumber,
    #[validate(length(min = 1, message = "Start date is required"))]
    pub start_date: String,
    #[validate(length(min = 1, message = "End date is required"))]
    pub end_date: String,
    /// Comma-separated list.
    #[serde(default)]
    pub materials: String,
}

impl CreateCourse {
    /// Coerce the form into a new document: numbers parsed, dates parsed,
    /// materials split, no students, active, both timestamps at `now`.
    pub fn to_document(
        &self,
        created_by: EntityId,
        now: Timestamp,
    ) -> Result<NewCourseDocument, CoreError> {
        Ok(NewCourseDocument {
            title: self.title.clone(),
            description: self.description.clone(),
            instructor: self.instructor.clone(),
            duration: self.duration.clone(),
            level: self.level,
            category: self.category.clone(),
            price: coerce_price(&self.price)?,
            max_students: coerce_max_students(&self.max_students)?,
            start_date: parse_calendar_date(&self.start_date, "startDate")?,
            end_date: parse_calendar_date(&self.end_date, "endDate")?,
            materials: parse_materials(&self.materials),
            enrolled_students: Vec::new(),
            is_active: true,
            created_by,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Partial course form. Omitted fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCourse {
    #[validate(length(min = 3, message = "Title must be at least 3 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 10, message = "Description must be at least 10 characters"))]
    pub description: Option<String>,
    #[validate(length(min = 2, message = "Instructor name is required"))]
    pub instructor: Option<String>,
    #[validate(length(min = 1, message = "Duration is required"))]
    pub duration: Option<String>,
    pub level: Option<CourseLevel>,
    #[validate(length(min = 2, message = "Category is required"))]
    pub category: Option<String>,
    pub price: Option<FormNumber>,
    pub max_students: Option<FormNumber>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub materials: Option<String>,
    pub is_active: Option<bool>,
}

impl UpdateCourse {
    /// Coerce the present fields with the same rules as
    /// [`CreateCourse::to_document`]. `updated_at` is always set.
    pub fn to_patch(&self, now: Timestamp) -> Result<CoursePatch, CoreError> {
        Ok(CoursePatch {
            title: self.title.clone(),
            description: self.description.clone(),
            instructor: self.instructor.clone(),
            duration: self.duration.clone(),
            level: self.level,
            category: self.category.clone(),
            price: self.price.as_ref().map(coerce_price).transpose()?,
            max_students: self
                .max_students
                .as_ref()
                .map(coerce_max_students)
                .transpose()?,
            start_date: self
                .start_date
                .as_deref()
                .map(|d| parse_calendar_date(d, "startDate"))
                .transpose()?,
            end_date: self
                .end_date
                .as_deref()
                .map(|d| parse_calendar_date(d, "endDate"))
                .transpose()?,
            materials: self.materials.as_deref().map(parse_materials),
            is_active: self.is_active,
            ..CoursePatch::touch(now)
        })
    }
}

/// A fully typed course ready to insert; the store assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCourseDocument {
    pub title: String,
    pub description: String,
    pub instructor: String,
    pub duration: String,
    pub level: CourseLevel,
    pub category: String,
    pub price: f64,
    pub max_students: u32,
    pub start_date: CalendarDate,
    pub end_date: CalendarDate,
    pub materials: Vec<String>,
    pub enrolled_students: Vec<EntityId>,
    pub is_active: bool,
    pub created_by: EntityId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl NewCourseDocument {
    pub fn into_course(self, id: EntityId) -> Course {
        Course {
            id,
            title: self.title,
            description: self.description,
            instructor: self.instructor,
            duration: self.duration,
            level: self.level,
            category: self.category,
            price: self.price,
            max_students: self.max_students,
            start_date: self.start_date,
            end_date: self.end_date,
            materials: self.materials,
            image_url: None,
            video_url: None,
            enrolled_students: self.enrolled_students,
            is_active: self.is_active,
            created_by: self.created_by,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Typed partial update. `Some` replaces, `None` keeps; `updated_at` always
/// replaces.
#[derive(Debug, Clone, PartialEq)]
pub struct CoursePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub instructor: Option<String>,
    pub duration: Option<String>,
    pub level: Option<CourseLevel>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub max_students: Option<u32>,
    pub start_date: Option<CalendarDate>,
    pub end_date: Option<CalendarDate>,
    pub materials: Option<Vec<String>>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub is_active: Option<bool>,
    pub updated_at: Timestamp,
}

impl CoursePatch {
    /// A patch that only bumps `updated_at`.
    pub fn touch(now: Timestamp) -> Self {
        Self {
            title: None,
            description: None,
            instructor: None,
            duration: None,
            level: None,
            category: None,
            price: None,
            max_students: None,
            start_date: None,
            end_date: None,
            materials: None,
            image_url: None,
            video_url: None,
            is_active: None,
            updated_at: now,
        }
    }

    pub fn apply_to(&self, course: &mut Course) {
        fn set<T: Clone>(target: &mut T, value: &Option<T>) {
            if let Some(v) = value {
                *target = v.clone();
            }
        }
        set(&mut course.title, &self.title);
        set(&mut course.description, &self.description);
        set(&mut course.instructor, &self.instructor);
        set(&mut course.duration, &self.duration);
        set(&mut course.level, &self.level);
        set(&mut course.category, &self.category);
        set(&mut course.price, &self.price);
        set(&mut course.max_students, &self.max_students);
        set(&mut course.start_date, &self.start_date);
        set(&mut course.end_date, &self.end_date);
        set(&mut course.materials, &self.materials);
        set(&mut course.is_active, &self.is_active);
        if self.image_url.is_some() {
            course.image_url = self.image_url.clone();
        }
        if self.video_url.is_some() {
            course.video_url = self.video_url.clone();
        }
        course.updated_at = self.updated_at;
    }
}

/// Equality filters for listing courses. Results are always newest first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CourseQuery {
    pub created_by: Option<EntityId>,
}

impl CourseQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn by_creator(created_by: EntityId) -> Self {
        Self {
            created_by: Some(created_by),
        }
    }
}
