use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

use crate::store::issuance::IssueError;
use crate::utils::response::error as error_response;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Sold out: {0}")]
    SoldOut(String),

    #[error("Transaction aborted: {0}")]
    TransactionAborted(String),

    #[error("Database error")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Internal server error")]
    InternalServerError(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::SoldOut(_) => StatusCode::BAD_REQUEST,
            AppError::TransactionAborted(_) => StatusCode::CONFLICT,
            AppError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::SoldOut(_) => "SOLD_OUT",
            AppError::TransactionAborted(_) => "TRANSACTION_ABORTED",
            AppError::DatabaseError(_) => "DATABASE_ERROR",
            AppError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    fn log(&self) {
        match self {
            AppError::ValidationError(msg)
            | AppError::NotFound(msg)
            | AppError::SoldOut(msg)
            | AppError::TransactionAborted(msg)
            | AppError::InternalServerError(msg) => {
                error!(error = ?self, message = %msg, "Application error");
            }
            AppError::DatabaseError(e) => {
                error!(error = ?e, "Database error");
            }
        }
    }
}

impl From<IssueError> for AppError {
    fn from(err: IssueError) -> Self {
        match err {
            IssueError::EventNotFound => {
                AppError::NotFound("Event was not found".to_string())
            }
            IssueError::SoldOut => AppError::SoldOut("Tickets are sold out".to_string()),
            IssueError::Aborted => AppError::TransactionAborted(
                "Purchase conflicted with a concurrent buyer, please retry".to_string(),
            ),
            IssueError::Database(e) => AppError::DatabaseError(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();

        // Log internal details
        self.log();

        // Only expose high-level message to the client
        let public_message = match &self {
            AppError::ValidationError(msg)
            | AppError::NotFound(msg)
            | AppError::SoldOut(msg)
            | AppError::TransactionAborted(msg)
            | AppError::InternalServerError(msg) => msg.clone(),
            AppError::DatabaseError(_) => "A database error occurred".to_string(),
        };

        // Do not expose internal details in the API response
        let details = None;

        error_response(code, public_message, details, status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_match_the_error_taxonomy() {
        let err = AppError::ValidationError("title too long".to_string());
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

        let err = AppError::NotFound("no such event".to_string());
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);

        let err = AppError::SoldOut("sold out".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let err = AppError::TransactionAborted("conflict".to_string());
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn sold_out_and_not_found_are_distinct_conditions() {
        let sold_out = AppError::from(IssueError::SoldOut);
        let not_found = AppError::from(IssueError::EventNotFound);
        assert_ne!(sold_out.status_code(), not_found.status_code());
        assert_ne!(sold_out.code(), not_found.code());
    }

    #[test]
    fn aborted_issue_maps_to_retryable_conflict() {
        let err = AppError::from(IssueError::Aborted);
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.code(), "TRANSACTION_ABORTED");
    }
}
