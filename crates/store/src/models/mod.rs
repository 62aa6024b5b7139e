//! Entity models and DTOs.

pub mod course;
pub mod enrollment;
pub mod identity;
pub mod media;
pub mod profile;
