//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- Resolves the session behind a JWT Bearer token.
//! - [`auth::MaybeAuthUser`] -- Same, but signed-out callers are allowed.
//! - [`rbac::RequireAdmin`] -- Requires the `admin` role.
//! - [`rbac::RequireAuth`] -- Requires any signed-in identity.

pub mod auth;
pub mod rbac;
