//! Session tokens.
//!
//! - [`jwt`] -- access-token generation and validation.
//!
//! Password hashing lives in the identity store adapters.

pub mod jwt;
