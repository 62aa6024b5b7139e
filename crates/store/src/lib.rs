//! Store ports, adapters, and the services built on them.
//!
//! - [`ports`] -- async traits for the document, identity and object stores.
//! - [`memory`], [`postgres`], [`s3`] -- adapters implementing those traits.
//! - [`repositories::CourseRepo`] -- course CRUD and enrollment membership.
//! - [`session::SessionContext`] -- current identity/profile and auth flows.

pub mod error;
pub mod memory;
pub mod models;
pub mod password;
pub mod ports;
pub mod postgres;
pub mod repositories;
pub mod s3;
pub mod session;

pub use error::{RepositoryError, StoreError};
