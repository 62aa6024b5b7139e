//! `courses`, `enrollments` and `users` tables.

use async_trait::async_trait;
use coursehub_core::types::{EntityId, Timestamp};

use super::rows::{
    CourseRow, EnrollmentRow, ProfileRow, COURSE_COLUMNS, ENROLLMENT_COLUMNS, PROFILE_COLUMNS,
};
use super::DbPool;
use crate::error::StoreError;
use crate::models::course::{Course, CoursePatch, CourseQuery, NewCourseDocument};
use crate::models::enrollment::{Enrollment, EnrollmentQuery, NewEnrollment};
use crate::models::profile::{ProfilePatch, UserProfile};
use crate::ports::{CourseStore, EnrollmentStore, ProfileStore};

/// Document ports backed by one PostgreSQL pool.
#[derive(Debug, Clone)]
pub struct PgDocumentStore {
    pool: DbPool,
}

impl PgDocumentStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn max_students_column(value: u32) -> Result<i32, StoreError> {
    i32::try_from(value)
        .map_err(|_| StoreError::Rejected(format!("maxStudents {value} is too large")))
}

#[async_trait]
impl CourseStore for PgDocumentStore {
    async fn insert(&self, doc: NewCourseDocument) -> Result<Course, StoreError> {
        let query = format!(
            "INSERT INTO courses (id, title, description, instructor, duration, level, category,
                price, max_students, start_date, end_date, materials, enrolled_students,
                is_active, created_by, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
             RETURNING {COURSE_COLUMNS}"
        );
        let row = sqlx::query_as::<_, CourseRow>(&query)
            .bind(EntityId::now_v7())
            .bind(&doc.title)
            .bind(&doc.description)
            .bind(&doc.instructor)
            .bind(&doc.duration)
            .bind(doc.level.as_str())
            .bind(&doc.category)
            .bind(doc.price)
            .bind(max_students_column(doc.max_students)?)
            .bind(doc.start_date)
            .bind(doc.end_date)
            .bind(&doc.materials)
            .bind(&doc.enrolled_students)
            .bind(doc.is_active)
            .bind(doc.created_by)
            .bind(doc.created_at)
            .bind(doc.updated_at)
            .fetch_one(&self.pool)
            .await?;
        row.try_into()
    }

    async fn get(&self, id: EntityId) -> Result<Option<Course>, StoreError> {
        let query = format!("SELECT {COURSE_COLUMNS} FROM courses WHERE id = $1");
        sqlx::query_as::<_, CourseRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Course::try_from)
            .transpose()
    }

    async fn list(&self, query: CourseQuery) -> Result<Vec<Course>, StoreError> {
        let sql = format!(
            "SELECT {COURSE_COLUMNS} FROM courses
             WHERE ($1::uuid IS NULL OR created_by = $1)
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, CourseRow>(&sql)
            .bind(query.created_by)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(Course::try_from)
            .collect()
    }

    async fn patch(&self, id: EntityId, patch: CoursePatch) -> Result<Course, StoreError> {
        let query = format!(
            "UPDATE courses SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                instructor = COALESCE($4, instructor),
                duration = COALESCE($5, duration),
                level = COALESCE($6, level),
                category = COALESCE($7, category),
                price = COALESCE($8, price),
                max_students = COALESCE($9, max_students),
                start_date = COALESCE($10, start_date),
                end_date = COALESCE($11, end_date),
                materials = COALESCE($12, materials),
                image_url = COALESCE($13, image_url),
                video_url = COALESCE($14, video_url),
                is_active = COALESCE($15, is_active),
                updated_at = $16
             WHERE id = $1
             RETURNING {COURSE_COLUMNS}"
        );
        let max_students = patch.max_students.map(max_students_column).transpose()?;
        sqlx::query_as::<_, CourseRow>(&query)
            .bind(id)
            .bind(&patch.title)
            .bind(&patch.description)
            .bind(&patch.instructor)
            .bind(&patch.duration)
            .bind(patch.level.map(|l| l.as_str()))
            .bind(&patch.category)
            .bind(patch.price)
            .bind(max_students)
            .bind(patch.start_date)
            .bind(patch.end_date)
            .bind(&patch.materials)
            .bind(&patch.image_url)
            .bind(&patch.video_url)
            .bind(patch.is_active)
            .bind(patch.updated_at)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::not_found("courses", id))?
            .try_into()
    }

    async fn add_student(
        &self,
        id: EntityId,
        user_id: EntityId,
        now: Timestamp,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE courses SET
                enrolled_students = CASE
                    WHEN $2 = ANY(enrolled_students) THEN enrolled_students
                    ELSE array_append(enrolled_students, $2)
                END,
                updated_at = $3
             WHERE id = $1",
        )
        .bind(id)
        .bind(user_id)
        .bind(now)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("courses", id));
        }
        Ok(())
    }

    async fn remove_student(
        &self,
        id: EntityId,
        user_id: EntityId,
        now: Timestamp,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE courses SET
                enrolled_students = array_remove(enrolled_students, $2),
                updated_at = $3
             WHERE id = $1",
        )
        .bind(id)
        .bind(user_id)
        .bind(now)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("courses", id));
        }
        Ok(())
    }

    async fn delete(&self, id: EntityId) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl EnrollmentStore for PgDocumentStore {
    /// A second insert for the same (user, course) pair returns the existing
    /// record instead of creating a duplicate.
    async fn insert(&self, doc: NewEnrollment) -> Result<Enrollment, StoreError> {
        let query = format!(
            "INSERT INTO enrollments (id, user_id, course_id, enrolled_at, progress, completed)
             VALUES ($1, $2, $3, $4, $5, $6)
             ON CONFLICT (user_id, course_id) DO NOTHING
             RETURNING {ENROLLMENT_COLUMNS}"
        );
        let inserted = sqlx::query_as::<_, EnrollmentRow>(&query)
            .bind(EntityId::now_v7())
            .bind(doc.user_id)
            .bind(doc.course_id)
            .bind(doc.enrolled_at)
            .bind(i16::from(doc.progress))
            .bind(doc.completed)
            .fetch_optional(&self.pool)
            .await?;

        let row = match inserted {
            Some(row) => row,
            None => {
                let existing = format!(
                    "SELECT {ENROLLMENT_COLUMNS} FROM enrollments
                     WHERE user_id = $1 AND course_id = $2"
                );
                sqlx::query_as::<_, EnrollmentRow>(&existing)
                    .bind(doc.user_id)
                    .bind(doc.course_id)
                    .fetch_one(&self.pool)
                    .await?
            }
        };
        row.try_into()
    }

    async fn list(&self, query: EnrollmentQuery) -> Result<Vec<Enrollment>, StoreError> {
        let sql = format!(
            "SELECT {ENROLLMENT_COLUMNS} FROM enrollments
             WHERE ($1::uuid IS NULL OR user_id = $1)
               AND ($2::uuid IS NULL OR course_id = $2)
             ORDER BY enrolled_at DESC, id DESC"
        );
        sqlx::query_as::<_, EnrollmentRow>(&sql)
            .bind(query.user_id)
            .bind(query.course_id)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(Enrollment::try_from)
            .collect()
    }

    async fn delete(&self, id: EntityId) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM enrollments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl ProfileStore for PgDocumentStore {
    async fn get(&self, uid: EntityId) -> Result<Option<UserProfile>, StoreError> {
        let query = format!("SELECT {PROFILE_COLUMNS} FROM users WHERE uid = $1");
        sqlx::query_as::<_, ProfileRow>(&query)
            .bind(uid)
            .fetch_optional(&self.pool)
            .await?
            .map(UserProfile::try_from)
            .transpose()
    }

    async fn merge(&self, uid: EntityId, patch: ProfilePatch) -> Result<UserProfile, StoreError> {
        let query = format!(
            "INSERT INTO users (uid, email, display_name, photo_url, role, created_at)
             VALUES ($1, COALESCE($2, ''), $3, $4, COALESCE($5, 'student'), $6)
             ON CONFLICT (uid) DO UPDATE SET
                email = COALESCE($2, users.email),
                display_name = COALESCE($3, users.display_name),
                photo_url = COALESCE($4, users.photo_url),
                role = COALESCE($5, users.role),
                created_at = COALESCE($6, users.created_at)
             RETURNING {PROFILE_COLUMNS}"
        );
        sqlx::query_as::<_, ProfileRow>(&query)
            .bind(uid)
            .bind(&patch.email)
            .bind(&patch.display_name)
            .bind(&patch.photo_url)
            .bind(patch.role.map(|r| r.as_str()))
            .bind(patch.created_at)
            .fetch_one(&self.pool)
            .await?
            .try_into()
    }
}
