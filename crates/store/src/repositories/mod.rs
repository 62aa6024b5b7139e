//! Services composed from the store ports.

pub mod course_repo;

pub use course_repo::{CourseRepo, DeletionReport, EnrolledCourse};
