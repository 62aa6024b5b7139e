//! Port for the `courses` collection.

use async_trait::async_trait;
use coursehub_core::types::{EntityId, Timestamp};

use crate::error::StoreError;
use crate::models::course::{Course, CoursePatch, CourseQuery, NewCourseDocument};

/// Document operations on courses.
///
/// Writes to the same document from concurrent callers are applied in
/// arrival order with last-write-wins on overlapping fields. The membership
/// operations are the exception: they are set operations evaluated by the
/// store, so concurrent enroll/unenroll calls on different students never
/// overwrite each other.
#[async_trait]
pub trait CourseStore: Send + Sync {
    /// Insert a new document and return it with its assigned id.
    async fn insert(&self, doc: NewCourseDocument) -> Result<Course, StoreError>;

    /// Fetch by id. `None` when the document does not exist.
    async fn get(&self, id: EntityId) -> Result<Option<Course>, StoreError>;

    /// List documents matching `query`, ordered by `created_at` descending.
    async fn list(&self, query: CourseQuery) -> Result<Vec<Course>, StoreError>;

    /// Merge `patch` into an existing document.
    ///
    /// Fails with [`StoreError::NotFound`] when the document does not exist.
    async fn patch(&self, id: EntityId, patch: CoursePatch) -> Result<Course, StoreError>;

    /// Add `user_id` to `enrolled_students` unless already present, and set
    /// `updated_at`.
    async fn add_student(
        &self,
        id: EntityId,
        user_id: EntityId,
        now: Timestamp,
    ) -> Result<(), StoreError>;

    /// Remove `user_id` from `enrolled_students` if present, and set
    /// `updated_at`.
    async fn remove_student(
        &self,
        id: EntityId,
        user_id: EntityId,
        now: Timestamp,
    ) -> Result<(), StoreError>;

    /// Delete the document. Deleting a missing document is not an error.
    async fn delete(&self, id: EntityId) -> Result<(), StoreError>;
}
