//! Connection pool and schema setup.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

const MAX_CONNECTIONS: u32 = 10;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

pub type Pool = PgPool;

/// Open a pool against `database_url`.
///
/// Fails fast when the database is unreachable rather than on the first request.
pub async fn create_pool(database_url: &str) -> Result<Pool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect(database_url)
        .await
}

/// Create or upgrade the `ships` and `crew_members` tables.
pub async fn run_migrations(pool: &Pool) -> Result<(), sqlx::migrate::MigrateError> {
    let migrator = sqlx::migrate!("./migrations");
    migrator.run(pool).await?;
    tracing::debug!(applied = migrator.iter().count(), "Schema up to date");
    Ok(())
}
