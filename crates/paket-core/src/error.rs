//! Error types for the domain model and the delivery store.

use thiserror::Error;

/// Convenience alias for core results.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors produced by domain validation and store operations.
///
/// Absence of a record is not an error: lookups return `Option` instead.
#[derive(Debug, Clone, Error)]
pub enum CoreError {
    /// Input failed domain validation (malformed identifier or field).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A natural key (order id or tracking number) already belongs to a
    /// different delivery.
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    /// Underlying database failure.
    #[error("database error: {0}")]
    Database(String),
}

impl CoreError {
    /// True when retrying the operation later may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CoreError::Database(_))
    }
}

impl From<sqlx::Error> for CoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                CoreError::ConstraintViolation(db_err.message().to_string())
            },
            _ => CoreError::Database(err.to_string()),
        }
    }
}
