use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

use crate::validation::ValidationError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Account {0} not found")]
    AccountNotFound(Uuid),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Insufficient funds")]
    InsufficientFunds,

    #[error("Source and destination accounts must differ")]
    SameAccount,

    #[error("Account balance must be zero before closing")]
    BalanceNotZero,

    #[error("{0} already registered")]
    DuplicateIdentity(&'static str),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::AccountNotFound(_) | AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::InsufficientFunds
            | AppError::SameAccount
            | AppError::BalanceNotZero
            | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::DuplicateIdentity(_) | AppError::Conflict(_) => StatusCode::CONFLICT,
        }
    }
}

/// True when the database rejected a write on the named UNIQUE constraint,
/// e.g. `"accounts.account_number"`. Lets callers turn an insert-time
/// collision into a retry instead of a 500.
pub fn is_unique_violation(err: &AppError, constraint: &str) -> bool {
    match err {
        AppError::Database(sqlx::Error::Database(db)) => {
            db.is_unique_violation() && db.message().contains(constraint)
        }
        _ => false,
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}
