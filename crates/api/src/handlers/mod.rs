pub mod admin_courses;
pub mod auth;
pub mod courses;
pub mod dashboard;
pub mod enrollments;
pub mod navigation;
