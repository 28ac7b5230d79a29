use axum::{
    extract::rejection::{BytesRejection, JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use core_types::ValidationError;
use database::DbError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Resource already exists with that ID, try another ID")]
    Conflict,
    #[error("Resource id ID not found or invalid")]
    NotFound,
    #[error(transparent)]
    Store(DbError),
    #[error(transparent)]
    Payload(#[from] JsonRejection),
    #[error(transparent)]
    Body(#[from] BytesRejection),
}

impl From<DbError> for AppError {
    fn from(err: DbError) -> Self {
        if err.is_conflict() {
            AppError::Conflict
        } else {
            AppError::Store(err)
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Conflict => StatusCode::CONFLICT,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Store(_) => StatusCode::BAD_REQUEST,
            AppError::Payload(rejection) => rejection.status(),
            AppError::Body(rejection) => rejection.status(),
        }
    }
}

/// Converts our custom `AppError` into a plain-text HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Store(db_err) => {
                tracing::error!(error = ?db_err, "Database error.");
                db_err.to_string()
            }
            AppError::Payload(rejection) => {
                tracing::warn!(error = %rejection, "Unreadable request body.");
                rejection.body_text()
            }
            AppError::Body(rejection) => {
                tracing::warn!(error = %rejection, "Request body could not be read.");
                rejection.body_text()
            }
            other => {
                tracing::warn!(status = %status, error = %other, "Request rejected.");
                other.to_string()
            }
        };

        (status, message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use database::Repository;
    use database::mock::MockRepository;

    #[test]
    fn store_conflicts_become_409() {
        let err = AppError::from(DbError::Conflict("Duplicate entry '1'".into()));
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(
            err.to_string(),
            "Resource already exists with that ID, try another ID"
        );
    }

    #[tokio::test]
    async fn other_store_failures_become_400_with_the_raw_message() {
        let repo = MockRepository::new();
        repo.set_unavailable(true);
        let db_err = repo.list_agents().await.unwrap_err();
        let raw = db_err.to_string();

        let err = AppError::from(db_err);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), raw);
    }

    #[test]
    fn validation_failures_become_422() {
        let err = AppError::from(ValidationError::single("id", "\"id\" must be a number"));
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.to_string(), "\"id\" must be a number");
    }
}
