//! Structured errors for the armory server.
//!
//! Each failure maps to its own JSON-RPC error code so clients can tell
//! bad input, upstream failures and timeouts apart without parsing text.

use armory_core::metrics::SinkError;
use armory_core::{Error, StoreError};
use rmcp::model::{ErrorCode, ErrorData as McpError};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ArmoryError {
    /// A resolve failed; carries the resolve taxonomy.
    #[error(transparent)]
    Resolve(#[from] Error),

    /// Listing records failed.
    #[error("STORE_UNAVAILABLE: {0}")]
    Store(#[from] StoreError),

    /// Rendering the metrics registry failed.
    #[error("METRICS_FAILED: {0}")]
    Metrics(#[from] SinkError),

    /// Invalid tool parameters.
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    #[error("INTERNAL: {0}")]
    Internal(String),
}

impl ArmoryError {
    fn code(&self) -> i32 {
        match self {
            ArmoryError::Resolve(Error::InvalidIdentifier(_)) | ArmoryError::InvalidInput(_) => -32602,
            ArmoryError::Resolve(Error::ParseFailed(_)) => -32001,
            ArmoryError::Resolve(Error::PersistFailed { .. }) => -32002,
            ArmoryError::Resolve(Error::StoreUnavailable(_)) | ArmoryError::Store(_) => -32003,
            ArmoryError::Resolve(Error::Cancelled(_)) => -32004,
            ArmoryError::Metrics(_) => -32005,
            ArmoryError::Internal(_) => -32603,
        }
    }
}

impl From<ArmoryError> for McpError {
    fn from(err: ArmoryError) -> Self {
        let data = match &err {
            ArmoryError::Resolve(e) => Some(json!({ "status": e.status().as_str(), "retryable": e.is_retryable() })),
            _ => None,
        };

        McpError { code: ErrorCode(err.code()), message: err.to_string().into(), data }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_identifier_is_invalid_params() {
        let err: McpError = ArmoryError::from(Error::InvalidIdentifier("te--st".into())).into();
        assert_eq!(err.code, ErrorCode(-32602));
        assert!(err.message.contains("INVALID_IDENTIFIER"));
        let data = err.data.unwrap();
        assert_eq!(data["status"], "invalid_name");
        assert_eq!(data["retryable"], false);
    }

    #[test]
    fn test_cancelled_has_its_own_code() {
        let err: McpError = ArmoryError::from(Error::Cancelled("Testchar: parse".into())).into();
        assert_eq!(err.code, ErrorCode(-32004));
        assert_eq!(err.data.unwrap()["status"], "cancelled");
    }

    #[test]
    fn test_store_error_has_no_status() {
        let err: McpError = ArmoryError::from(StoreError::NotFound("x".into())).into();
        assert_eq!(err.code, ErrorCode(-32003));
        assert!(err.data.is_none());
    }
}
