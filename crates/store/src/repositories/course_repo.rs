//! Repository for the `courses` and `enrollments` collections plus course media.

use std::sync::Arc;

use coursehub_core::error::CoreError;
use coursehub_core::types::EntityId;
use futures::future::{join_all, try_join_all};
use mockable::Clock;
use serde::Serialize;
use validator::Validate;

use crate::error::{RepositoryError, StoreError};
use crate::models::course::{Course, CoursePatch, CourseQuery, CreateCourse, UpdateCourse};
use crate::models::enrollment::{Enrollment, EnrollmentQuery, NewEnrollment};
use crate::models::media::{MediaSlot, MediaUpload, ObjectPath};
use crate::ports::{CourseStore, EnrollmentStore, ObjectStorage};

/// What a [`CourseRepo::delete`] cascade removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletionReport {
    pub image_removed: bool,
    pub video_removed: bool,
    pub enrollments_removed: usize,
}

/// An enrollment joined with the course it points at.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrolledCourse {
    pub enrollment: Enrollment,
    pub course: Course,
}

/// Course CRUD, enrollment membership and course media.
///
/// Holds no cache: every call round-trips to the injected stores.
#[derive(Clone)]
pub struct CourseRepo {
    courses: Arc<dyn CourseStore>,
    enrollments: Arc<dyn EnrollmentStore>,
    objects: Arc<dyn ObjectStorage>,
    clock: Arc<dyn Clock>,
}

impl CourseRepo {
    pub fn new(
        courses: Arc<dyn CourseStore>,
        enrollments: Arc<dyn EnrollmentStore>,
        objects: Arc<dyn ObjectStorage>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            courses,
            enrollments,
            objects,
            clock,
        }
    }

    /// All courses, newest first. Inactive courses are included.
    pub async fn list_all(&self) -> Result<Vec<Course>, RepositoryError> {
        Ok(self.courses.list(CourseQuery::all()).await?)
    }

    /// Find a course by id. Absence is `Ok(None)`, not an error.
    pub async fn get_by_id(&self, id: EntityId) -> Result<Option<Course>, RepositoryError> {
        Ok(self.courses.get(id).await?)
    }

    /// Courses created by `creator_id`, newest first.
    pub async fn list_by_instructor(
        &self,
        creator_id: EntityId,
    ) -> Result<Vec<Course>, RepositoryError> {
        Ok(self.courses.list(CourseQuery::by_creator(creator_id)).await?)
    }

    /// Validate and coerce the form, then insert a new active course with no
    /// students. Returns the new id.
    pub async fn create(
        &self,
        input: &CreateCourse,
        creator_id: EntityId,
    ) -> Result<EntityId, RepositoryError> {
        input
            .validate()
            .map_err(|e| CoreError::Validation(e.to_string()))?;
        let doc = input.to_document(creator_id, self.clock.utc())?;
        let course = self.courses.insert(doc).await?;
        tracing::info!(course_id = %course.id, created_by = %creator_id, title = %course.title, "Course created");
        Ok(course.id)
    }

    /// Merge the fields present in `input` into the course and bump
    /// `updatedAt`. Fails with a store NotFound error when the course is gone.
    pub async fn update(
        &self,
        id: EntityId,
        input: &UpdateCourse,
    ) -> Result<Course, RepositoryError> {
        input
            .validate()
            .map_err(|e| CoreError::Validation(e.to_string()))?;
        let patch = input.to_patch(self.clock.utc())?;
        let course = self.courses.patch(id, patch).await?;
        tracing::info!(course_id = %id, "Course updated");
        Ok(course)
    }

    /// Delete a course and everything hanging off it.
    ///
    /// Steps run in order without compensation: image, video, enrollments
    /// (concurrently), then the course document. Media failures are logged
    /// and skipped. Any later failure is logged together with the steps that
    /// already completed and returned; completed steps are not undone.
    pub async fn delete(&self, id: EntityId) -> Result<DeletionReport, RepositoryError> {
        let mut report = DeletionReport {
            image_removed: self.remove_media(id, MediaSlot::Image).await,
            video_removed: self.remove_media(id, MediaSlot::Video).await,
            enrollments_removed: 0,
        };

        let enrollments = match self.enrollments.list(EnrollmentQuery::by_course(id)).await {
            Ok(list) => list,
            Err(err) => return Err(Self::abort_delete(id, &report, "list enrollments", err)),
        };
        let deletions = enrollments.iter().map(|e| self.enrollments.delete(e.id));
        if let Err(err) = try_join_all(deletions).await {
            return Err(Self::abort_delete(id, &report, "delete enrollments", err));
        }
        report.enrollments_removed = enrollments.len();

        if let Err(err) = self.courses.delete(id).await {
            return Err(Self::abort_delete(id, &report, "delete course document", err));
        }

        tracing::info!(
            course_id = %id,
            image_removed = report.image_removed,
            video_removed = report.video_removed,
            enrollments_removed = report.enrollments_removed,
            "Course deleted"
        );
        Ok(report)
    }

    fn abort_delete(
        id: EntityId,
        report: &DeletionReport,
        step: &'static str,
        err: StoreError,
    ) -> RepositoryError {
        tracing::error!(
            course_id = %id,
            step,
            image_removed = report.image_removed,
            video_removed = report.video_removed,
            enrollments_removed = report.enrollments_removed,
            error = %err,
            "Course deletion stopped part-way; completed steps are not rolled back"
        );
        err.into()
    }

    /// Best-effort media removal for the delete cascade. Never fails.
    async fn remove_media(&self, id: EntityId, slot: MediaSlot) -> bool {
        let path = ObjectPath::course_media(id, slot);
        match self.objects.delete(&path).await {
            Ok(()) => true,
            Err(StoreError::NotFound { .. }) => {
                tracing::debug!(course_id = %id, slot = slot.as_str(), "No course media to remove");
                false
            }
            Err(err) => {
                tracing::warn!(course_id = %id, slot = slot.as_str(), error = %err, "Failed to remove course media, continuing");
                false
            }
        }
    }

    /// Store the course image and point `imageUrl` at it. Returns the URL.
    pub async fn upload_image(
        &self,
        id: EntityId,
        upload: MediaUpload,
    ) -> Result<String, RepositoryError> {
        self.upload_media(id, MediaSlot::Image, upload).await
    }

    /// Store the course video and point `videoUrl` at it. Returns the URL.
    pub async fn upload_video(
        &self,
        id: EntityId,
        upload: MediaUpload,
    ) -> Result<String, RepositoryError> {
        self.upload_media(id, MediaSlot::Video, upload).await
    }

    async fn upload_media(
        &self,
        id: EntityId,
        slot: MediaSlot,
        upload: MediaUpload,
    ) -> Result<String, RepositoryError> {
        let path = ObjectPath::course_media(id, slot);
        let size = upload.bytes.len();
        let url = self.objects.put(&path, upload).await?;

        let mut patch = CoursePatch::touch(self.clock.utc());
        match slot {
            MediaSlot::Image => patch.image_url = Some(url.clone()),
            MediaSlot::Video => patch.video_url = Some(url.clone()),
        }
        self.courses.patch(id, patch).await?;

        tracing::info!(course_id = %id, slot = slot.as_str(), size, "Course media uploaded");
        Ok(url)
    }

    /// Add `user_id` to the course roster and record an enrollment.
    ///
    /// Idempotent for the pair: when an enrollment already exists it is
    /// returned and no second record is written. Capacity is not checked
    /// here.
    pub async fn enroll(
        &self,
        course_id: EntityId,
        user_id: EntityId,
    ) -> Result<Enrollment, RepositoryError> {
        let now = self.clock.utc();
        self.courses.add_student(course_id, user_id, now).await?;

        let existing = self
            .enrollments
            .list(EnrollmentQuery::by_pair(user_id, course_id))
            .await?;
        if let Some(enrollment) = existing.into_iter().next() {
            tracing::debug!(%course_id, %user_id, enrollment_id = %enrollment.id, "Already enrolled");
            return Ok(enrollment);
        }

        let enrollment = self
            .enrollments
            .insert(NewEnrollment::started(user_id, course_id, now))
            .await?;
        tracing::info!(%course_id, %user_id, enrollment_id = %enrollment.id, "Student enrolled");
        Ok(enrollment)
    }

    /// Remove `user_id` from the roster and delete every enrollment for the
    /// pair. A no-op for non-members. Returns how many records were deleted.
    pub async fn unenroll(
        &self,
        course_id: EntityId,
        user_id: EntityId,
    ) -> Result<usize, RepositoryError> {
        self.courses
            .remove_student(course_id, user_id, self.clock.utc())
            .await?;

        let matches = self
            .enrollments
            .list(EnrollmentQuery::by_pair(user_id, course_id))
            .await?;
        try_join_all(matches.iter().map(|e| self.enrollments.delete(e.id))).await?;

        tracing::info!(%course_id, %user_id, removed = matches.len(), "Student unenrolled");
        Ok(matches.len())
    }

    /// A user's enrollments, newest first.
    pub async fn list_enrollments_by_user(
        &self,
        user_id: EntityId,
    ) -> Result<Vec<Enrollment>, RepositoryError> {
        Ok(self
            .enrollments
            .list(EnrollmentQuery::by_user(user_id))
            .await?)
    }

    /// A user's enrollments joined with their courses. Course lookups run
    /// concurrently; enrollments whose course no longer exists are dropped.
    pub async fn list_enrolled_courses(
        &self,
        user_id: EntityId,
    ) -> Result<Vec<EnrolledCourse>, RepositoryError> {
        let enrollments = self.list_enrollments_by_user(user_id).await?;
        let lookups = join_all(enrollments.iter().map(|e| self.courses.get(e.course_id))).await;

        let mut joined = Vec::with_capacity(enrollments.len());
        for (enrollment, course) in enrollments.into_iter().zip(lookups) {
            match course? {
                Some(course) => joined.push(EnrolledCourse { enrollment, course }),
                None => {
                    tracing::debug!(%user_id, course_id = %enrollment.course_id, "Enrollment points at a missing course");
                }
            }
        }
        Ok(joined)
    }
}
