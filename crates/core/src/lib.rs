//! Framework-free domain logic for the course catalogue.
//!
//! Nothing in this crate performs I/O. Store adapters, the course repository
//! and the HTTP surface build on these types.

pub mod authorization;
pub mod course;
pub mod error;
pub mod roles;
pub mod stats;
pub mod types;
