//! Record store errors.

use tokio_rusqlite::rusqlite;

/// Errors reported by a [`super::RecordStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No record exists for the id.
    #[error("record not found: {0}")]
    NotFound(String),

    /// A record with the id already exists.
    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    /// A row exists but could not be decoded.
    #[error("corrupt record {id}: {reason}")]
    Corrupt { id: String, reason: String },

    /// Database operation failed.
    #[error("database error: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("migration failed: {0}")]
    MigrationFailed(String),
}

impl StoreError {
    /// True when the error is a primary key or unique constraint violation.
    pub(crate) fn is_constraint_violation(err: &rusqlite::Error) -> bool {
        err.sqlite_error_code() == Some(rusqlite::ErrorCode::ConstraintViolation)
    }
}

impl From<tokio_rusqlite::Error<StoreError>> for StoreError {
    fn from(err: tokio_rusqlite::Error<StoreError>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => StoreError::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => StoreError::Database(tokio_rusqlite::Error::Close(c)),
            _ => StoreError::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for StoreError {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        StoreError::Database(err)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::Database(tokio_rusqlite::Error::Error(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StoreError::DuplicateKey("Testchar".to_string());
        assert!(err.to_string().contains("duplicate key"));
        assert!(err.to_string().contains("Testchar"));
    }

    #[test]
    fn test_query_errors_are_not_constraint_violations() {
        assert!(!StoreError::is_constraint_violation(&rusqlite::Error::QueryReturnedNoRows));
    }
}
