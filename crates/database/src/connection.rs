use crate::error::DbError;
use configuration::DatabaseSettings;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};

/// Builds the bounded connection pool for the sample database.
///
/// The pool is lazy: no connection is opened until the first request (or
/// [`probe`]) needs one, so the server can start while the database is down.
pub fn connect(settings: &DatabaseSettings) -> Result<MySqlPool, DbError> {
    if settings.url.trim().is_empty() {
        return Err(DbError::ConnectionConfigError(
            "DATABASE_URL must be set.".to_string(),
        ));
    }

    let pool = MySqlPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(settings.acquire_timeout())
        .connect_lazy(&settings.url)
        .map_err(|e| DbError::ConnectionConfigError(e.to_string()))?;

    Ok(pool)
}

/// Checks out one connection, reports its server-side id and returns it to the pool.
pub async fn probe(pool: &MySqlPool) -> Result<u64, DbError> {
    let mut conn = pool.acquire().await?;
    let connection_id: u64 = sqlx::query_scalar("SELECT CAST(CONNECTION_ID() AS UNSIGNED)")
        .fetch_one(&mut *conn)
        .await?;
    Ok(connection_id)
}

/// Applies the embedded schema migrations (tables of the sample database).
pub async fn run_migrations(pool: &MySqlPool) -> Result<(), DbError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_url_is_a_configuration_error() {
        let settings = DatabaseSettings::default();
        assert!(matches!(
            connect(&settings),
            Err(DbError::ConnectionConfigError(_))
        ));
    }
}
