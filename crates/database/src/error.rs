use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Invalid database connection settings: {0}")]
    ConnectionConfigError(String),

    /// Any driver or pool failure. Displays the driver's message unchanged.
    #[error("{0}")]
    Query(#[from] sqlx::Error),

    /// The statement violated a unique key (MySQL error 1062).
    #[error("{0}")]
    Conflict(String),

    #[error("Database migration failed: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),
}

impl DbError {
    /// Separates duplicate-key violations from every other execution failure.
    pub fn classify(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                Self::Conflict(db.message().to_string())
            }
            _ => Self::Query(err),
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_errors_are_not_conflicts() {
        let err = DbError::classify(sqlx::Error::PoolTimedOut);
        assert!(!err.is_conflict());
        assert_eq!(err.to_string(), sqlx::Error::PoolTimedOut.to_string());
    }
}
