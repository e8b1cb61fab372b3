//! Database connection pool management.

use scount_core::DatabaseConfig;
use scount_data::DataError;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::error::SqlxErrorExt;

/// Create a PostgreSQL connection pool and open its first connection.
///
/// # Errors
///
/// Returns an error if the connection fails.
///
/// ```ignore
/// let pool = create_pool(&config.section::<DatabaseConfig>()?).await?;
/// ```
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, DataError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout())
        .connect(&config.url)
        .await
        .map_err(SqlxErrorExt::into_data_error)?;
    tracing::info!(
        max_connections = config.max_connections,
        "database pool ready"
    );
    Ok(pool)
}
