//! PostgreSQL adapters.
//!
//! Each collection is a table; the membership set is a `UUID[]` column
//! updated with array operators so set semantics are evaluated by the
//! database.

mod documents;
mod identity;
mod rows;

use sqlx::postgres::PgPoolOptions;

pub use documents::PgDocumentStore;
pub use identity::PgIdentityStore;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply pending migrations from `crates/store/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
