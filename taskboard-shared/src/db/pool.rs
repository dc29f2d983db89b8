/// PostgreSQL pool for [`crate::store::postgres::PgStore`]
///
/// Only the URL and the pool size come from configuration
/// (`DATABASE_URL`, `DATABASE_MAX_CONNECTIONS`); timeouts are fixed.
///
/// ```no_run
/// use taskboard_shared::db::pool::create_pool;
///
/// # async fn example() -> Result<(), sqlx::Error> {
/// let pool = create_pool("postgresql://localhost/taskboard", 10).await?;
/// # Ok(())
/// # }
/// ```

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{info, warn};

/// How long a request waits for a free connection
pub const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);

/// Idle connections are closed after this long
pub const IDLE_TIMEOUT: Duration = Duration::from_secs(600);

fn pool_options(max_connections: u32) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .min_connections(1)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .idle_timeout(IDLE_TIMEOUT)
}

/// Connects and verifies the server answers before returning the pool
pub async fn create_pool(url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    info!(max_connections, "Creating database connection pool");

    let pool = pool_options(max_connections).connect(url).await?;
    health_check(&pool).await?;

    info!("Database connection pool created");
    Ok(pool)
}

/// Round trip used by `GET /health` and at startup
pub async fn health_check(pool: &PgPool) -> Result<(), sqlx::Error> {
    let (one,): (i32,) = sqlx::query_as("SELECT 1").fetch_one(pool).await?;

    if one != 1 {
        warn!(value = one, "Unexpected health check result");
        return Err(sqlx::Error::Protocol("unexpected health check result".into()));
    }
    Ok(())
}

/// Closes the pool, waiting for checked-out connections to return
pub async fn close_pool(pool: PgPool) {
    info!("Closing database connection pool");
    pool.close().await;
}
