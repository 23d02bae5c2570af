/**
 * Server Configuration
 *
 * Configuration is loaded from environment variables:
 *
 * - `DATABASE_URL` - PostgreSQL connection string (required)
 * - `SERVER_PORT`  - listen port (optional, default 3000)
 * - `JWT_SECRET`   - token signing secret (read in `auth::sessions`)
 *
 * The database is required: unlike optional integrations, this service has
 * no useful degraded mode without its stores, so a missing or unreachable
 * database is a startup error.
 */

use sqlx::PgPool;

/// Load and initialize the database connection pool
///
/// Reads `DATABASE_URL`, creates a PostgreSQL connection pool, and runs
/// the bundled migrations.
///
/// # Errors
///
/// Returns an error if `DATABASE_URL` is unset, the connection fails, or
/// migrations cannot be applied.
pub async fn load_database() -> Result<PgPool, sqlx::Error> {
    let database_url = std::env::var("DATABASE_URL").map_err(|_| {
        sqlx::Error::Configuration("DATABASE_URL is not set".into())
    })?;

    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(&database_url).await?;
    tracing::info!("Database connection pool created");

    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Database migrations completed");

    Ok(pool)
}
