//! Cached character records.

use std::time::Duration;

use chrono::{DateTime, SubsecRound, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::snapshot::CharacterSnapshot;

/// A persisted snapshot with its identity and refresh time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub snapshot: CharacterSnapshot,
    pub last_refreshed_at: DateTime<Utc>,
}

/// Lightweight listing entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSummary {
    pub id: String,
    pub last_refreshed_at: DateTime<Utc>,
}

impl Record {
    pub fn new(id: impl Into<String>, snapshot: CharacterSnapshot, last_refreshed_at: DateTime<Utc>) -> Self {
        Self { id: id.into(), snapshot, last_refreshed_at }
    }

    /// Time elapsed since the last refresh. Negative if the stored time is ahead of `now`.
    pub fn age(&self, now: DateTime<Utc>) -> TimeDelta {
        now - self.last_refreshed_at
    }

    /// A record is stale once its age reaches `ttl`; a zero ttl is always stale.
    pub fn is_stale(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        if ttl.is_zero() {
            return true;
        }
        let ttl = TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX);
        self.age(now) >= ttl
    }
}

/// Current time at the precision the store keeps (microseconds).
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}
