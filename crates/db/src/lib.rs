//! AgriHub persistence layer.
//!
//! Connection pool management, embedded migrations, entity models, and
//! repositories. Repositories are stateless structs with associated
//! functions taking a pool (or transaction) as their first argument; all
//! multi-step stock and status mutations run inside a single transaction
//! with the affected rows locked `FOR UPDATE`.

pub mod models;
pub mod repositories;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Shared PostgreSQL connection pool type.
pub type DbPool = PgPool;

/// Default maximum number of pooled connections.
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Create a connection pool against the given database URL.
///
/// `DATABASE_MAX_CONNECTIONS` overrides the default pool size.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    let max_connections: u32 = std::env::var("DATABASE_MAX_CONNECTIONS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_MAX_CONNECTIONS);

    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Verify the database is reachable with a trivial round-trip query.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(pool).await?;
    Ok(())
}

/// Apply all embedded migrations from `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
