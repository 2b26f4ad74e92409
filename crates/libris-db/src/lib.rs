//! # Libris DB
//!
//! PostgreSQL pool setup, the embedded schema migrations and the overdue
//! sweep shared by the server and the CLI.
//!
//! ```ignore
//! let pool = libris_db::init_db_pool().await?;
//! libris_db::run_migrations(&pool).await?;
//! ```

use std::env;
use std::time::Duration;

use chrono::NaiveDate;
use sqlx::postgres::PgPoolOptions;

pub use sqlx::PgPool;

/// Connects to `DATABASE_URL`.
///
/// Pool size comes from `DATABASE_MAX_CONNECTIONS` (default 10).
pub async fn init_db_pool() -> Result<PgPool, sqlx::Error> {
    let database_url = env::var("DATABASE_URL")
        .map_err(|_| sqlx::Error::Configuration("DATABASE_URL must be set".into()))?;
    let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(10);

    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&database_url)
        .await?;

    tracing::info!(max_connections, "Database pool ready");
    Ok(pool)
}

/// Applies the migrations under `migrations/` at the workspace root.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}

/// Moves every open loan whose due date lies before `as_of` to overdue and
/// returns how many moved. Books are untouched: an overdue loan still holds
/// its book.
pub async fn mark_overdue_loans<'e, E>(executor: E, as_of: NaiveDate) -> Result<u64, sqlx::Error>
where
    E: sqlx::PgExecutor<'e>,
{
    let result = sqlx::query(
        "UPDATE loans SET status = 'overdue' WHERE status = 'open' AND due_date < $1",
    )
    .bind(as_of)
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}
