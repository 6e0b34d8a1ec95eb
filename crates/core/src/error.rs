//! Resolve error taxonomy.
//!
//! Every failure a caller can observe from [`crate::Orchestrator::resolve`]
//! is one of these variants. Payloads are plain strings so that a single
//! outcome can be cloned out to every caller joined on the same in-flight
//! resolve.

use std::fmt;

use crate::status::ResolveStatus;

/// Which write failed after a successful parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOp {
    /// First persist of an unknown character.
    Insert,
    /// Snapshot replacement of a stale record.
    Replace,
}

impl fmt::Display for WriteOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteOp::Insert => f.write_str("insert"),
            WriteOp::Replace => f.write_str("replace"),
        }
    }
}

/// Unified error type for resolving a character.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Client input rejected by name validation. Never worth retrying.
    #[error("INVALID_IDENTIFIER: {0}")]
    InvalidIdentifier(String),

    /// The parser failed. Nothing was written.
    #[error("PARSE_FAILED: {0}")]
    ParseFailed(String),

    /// The store rejected a write after a successful parse.
    #[error("PERSIST_FAILED: {op}: {message}")]
    PersistFailed { op: WriteOp, message: String },

    /// Reading the record failed for a reason other than not-found.
    #[error("STORE_UNAVAILABLE: {0}")]
    StoreUnavailable(String),

    /// The caller's cancellation signal fired while blocked.
    #[error("CANCELLED: {0}")]
    Cancelled(String),
}

impl Error {
    /// Status label recorded for this failure.
    pub fn status(&self) -> ResolveStatus {
        match self {
            Error::InvalidIdentifier(_) => ResolveStatus::InvalidName,
            Error::ParseFailed(_) => ResolveStatus::ParseError,
            Error::PersistFailed { op: WriteOp::Insert, .. } => ResolveStatus::StoreError,
            Error::PersistFailed { op: WriteOp::Replace, .. } => ResolveStatus::UpdateError,
            Error::StoreUnavailable(_) => ResolveStatus::DbError,
            Error::Cancelled(_) => ResolveStatus::Cancelled,
        }
    }

    /// Whether repeating the same call could succeed.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Error::InvalidIdentifier(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidIdentifier("te--st".to_string());
        assert!(err.to_string().contains("INVALID_IDENTIFIER"));
        assert!(err.to_string().contains("te--st"));

        let err = Error::PersistFailed { op: WriteOp::Replace, message: "disk full".into() };
        assert_eq!(err.to_string(), "PERSIST_FAILED: replace: disk full");
    }

    #[test]
    fn test_persist_status_depends_on_write() {
        let insert = Error::PersistFailed { op: WriteOp::Insert, message: String::new() };
        let replace = Error::PersistFailed { op: WriteOp::Replace, message: String::new() };
        assert_eq!(insert.status(), ResolveStatus::StoreError);
        assert_eq!(replace.status(), ResolveStatus::UpdateError);
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(Error::InvalidIdentifier(String::new()).status(), ResolveStatus::InvalidName);
        assert_eq!(Error::ParseFailed(String::new()).status(), ResolveStatus::ParseError);
        assert_eq!(Error::StoreUnavailable(String::new()).status(), ResolveStatus::DbError);
        assert_eq!(Error::Cancelled(String::new()).status(), ResolveStatus::Cancelled);
    }

    #[test]
    fn test_invalid_identifier_not_retryable() {
        assert!(!Error::InvalidIdentifier("x".into()).is_retryable());
        assert!(Error::ParseFailed("x".into()).is_retryable());
        assert!(Error::Cancelled("x".into()).is_retryable());
    }
}
