//! Resolve outcome labels.
//!
//! Every call to [`crate::Orchestrator::resolve`] ends with exactly one of
//! these labels, which is what the request-accounting counter is keyed on.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Closed set of resolve outcomes.
///
/// Using an enum instead of free-form strings keeps the counter's label
/// cardinality fixed at `ids × ResolveStatus::ALL.len()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolveStatus {
    /// The identifier failed name validation.
    InvalidName,
    /// The parser could not produce a snapshot.
    ParseError,
    /// Inserting a freshly parsed record failed.
    StoreError,
    /// Replacing the snapshot of a stale record failed.
    UpdateError,
    /// Reading the record failed for a reason other than not-found.
    DbError,
    /// The caller's cancellation signal fired while the call was blocked.
    Cancelled,
    /// A fresh record was served without parsing.
    Cached,
    /// A record was created or refreshed.
    Success,
}

impl ResolveStatus {
    pub const ALL: [ResolveStatus; 8] = [
        ResolveStatus::InvalidName,
        ResolveStatus::ParseError,
        ResolveStatus::StoreError,
        ResolveStatus::UpdateError,
        ResolveStatus::DbError,
        ResolveStatus::Cancelled,
        ResolveStatus::Cached,
        ResolveStatus::Success,
    ];

    /// Label value used on the resolve counter.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolveStatus::InvalidName => "invalid_name",
            ResolveStatus::ParseError => "parse_error",
            ResolveStatus::StoreError => "store_error",
            ResolveStatus::UpdateError => "update_error",
            ResolveStatus::DbError => "db_error",
            ResolveStatus::Cancelled => "cancelled",
            ResolveStatus::Cached => "cached",
            ResolveStatus::Success => "success",
        }
    }

    /// Whether this outcome carries a record back to the caller.
    pub fn is_ok(&self) -> bool {
        matches!(self, ResolveStatus::Cached | ResolveStatus::Success)
    }
}

impl fmt::Display for ResolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_are_unique() {
        let mut labels: Vec<_> = ResolveStatus::ALL.iter().map(ResolveStatus::as_str).collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), ResolveStatus::ALL.len());
    }

    #[test]
    fn test_serde_matches_label() {
        for status in ResolveStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
    }

    #[test]
    fn test_only_cached_and_success_are_ok() {
        let ok: Vec<_> = ResolveStatus::ALL.into_iter().filter(ResolveStatus::is_ok).collect();
        assert_eq!(ok, vec![ResolveStatus::Cached, ResolveStatus::Success]);
    }
}
