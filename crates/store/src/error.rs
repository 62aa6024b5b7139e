use coursehub_core::error::CoreError;

/// Failure reported by a store adapter.
///
/// Every variant renders as a human-readable message; callers decide whether
/// to retry. No adapter retries on its own.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Network failure or the backing service is down.
    #[error("Store operation failed: service unavailable: {0}")]
    Unavailable(String),

    #[error("Store operation failed: permission denied: {0}")]
    PermissionDenied(String),

    /// A by-id write targeted a document that does not exist.
    #[error("Store operation failed: {collection} document {id} does not exist")]
    NotFound {
        collection: &'static str,
        id: String,
    },

    #[error("Store operation failed: {0}")]
    Conflict(String),

    /// The store refused the input (e.g. a password below the provider minimum).
    #[error("Store operation rejected: {0}")]
    Rejected(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Store operation failed: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn not_found(collection: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            collection,
            id: id.to_string(),
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                Self::Unavailable(err.to_string())
            }
            sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
                Self::Conflict(db_err.message().to_string())
            }
            sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("42501") => {
                Self::PermissionDenied(db_err.message().to_string())
            }
            _ => Self::Backend(err.to_string()),
        }
    }
}

/// Error returned by the course repository and session context: either the
/// input could not be coerced, or a store call failed.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error(transparent)]
    Input(#[from] CoreError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
