//! Port for the `enrollments` collection.

use async_trait::async_trait;
use coursehub_core::types::EntityId;

use crate::error::StoreError;
use crate::models::enrollment::{Enrollment, EnrollmentQuery, NewEnrollment};

/// Document operations on enrollments.
///
/// `user_id`/`course_id` are plain references; the store does not check that
/// the course or identity exists.
#[async_trait]
pub trait EnrollmentStore: Send + Sync {
    async fn insert(&self, doc: NewEnrollment) -> Result<Enrollment, StoreError>;

    /// List enrollments matching every filter in `query`, ordered by
    /// `enrolled_at` descending.
    async fn list(&self, query: EnrollmentQuery) -> Result<Vec<Enrollment>, StoreError>;

    /// Delete one enrollment. Deleting a missing document is not an error.
    async fn delete(&self, id: EntityId) -> Result<(), StoreError>;
}
