//! Error types for feedpool.

use thiserror::Error;

use crate::feed::fetcher::FetchError;

/// Common error type for feedpool.
#[derive(Error, Debug)]
pub enum FeedPoolError {
    /// Database error.
    ///
    /// Generic database error wrapping anything sqlx reports outside the
    /// expected duplicate-row cases (those are success variants, not errors).
    #[error("database error: {0}")]
    Database(String),

    /// Database connection error.
    #[error("database connection error: {0}")]
    DatabaseConnection(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Authentication error.
    #[error("authentication error: {0}")]
    Auth(String),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Feed fetch or parse failure.
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Refresh queue error.
    #[error("queue error: {0}")]
    Queue(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

// Conversion from sqlx errors
impl From<sqlx::Error> for FeedPoolError {
    fn from(e: sqlx::Error) -> Self {
        FeedPoolError::Database(e.to_string())
    }
}

/// Result type alias for feedpool operations.
pub type Result<T> = std::result::Result<T, FeedPoolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_display() {
        let err = FeedPoolError::Auth("invalid password".to_string());
        assert_eq!(err.to_string(), "authentication error: invalid password");
    }

    #[test]
    fn test_not_found_error_display() {
        let err = FeedPoolError::NotFound("subscription".to_string());
        assert_eq!(err.to_string(), "subscription not found");
    }

    #[test]
    fn test_fetch_error_conversion() {
        let err: FeedPoolError = FetchError::Timeout.into();
        assert!(matches!(err, FeedPoolError::Fetch(FetchError::Timeout)));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: FeedPoolError = io_err.into();
        assert!(matches!(err, FeedPoolError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_result_alias() {
        fn sample_ok() -> Result<i32> {
            Ok(42)
        }

        fn sample_err() -> Result<i32> {
            Err(FeedPoolError::Auth("test".to_string()))
        }

        assert_eq!(sample_ok().unwrap(), 42);
        assert!(sample_err().is_err());
    }
}
