//! Store ports.
//!
//! Each external collaborator (document collections, identity provider,
//! object storage) is reached only through one of these traits. Services hold
//! them as `Arc<dyn Trait>` so tests can inject the in-memory adapters.

pub mod course_store;
pub mod enrollment_store;
pub mod identity_store;
pub mod object_storage;
pub mod profile_store;

pub use course_store::CourseStore;
pub use enrollment_store::EnrollmentStore;
pub use identity_store::IdentityStore;
pub use object_storage::ObjectStorage;
pub use profile_store::ProfileStore;
