//! Durable record storage.
//!
//! [`RecordStore`] is the boundary the orchestrator talks to. [`RecordDb`]
//! is the SQLite implementation:
//!
//! - One row per character id, enforced by the primary key
//! - Snapshots stored as JSON text, timestamps as RFC 3339
//! - Automatic schema migrations
//! - WAL mode for concurrent access

pub mod connection;
pub mod error;
pub mod records;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::record::{Record, RecordSummary};
use crate::snapshot::CharacterSnapshot;

pub use connection::RecordDb;
pub use error::StoreError;

/// Keyed storage for character records.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Look up a record. `Ok(None)` means not found.
    async fn find(&self, id: &str) -> Result<Option<Record>, StoreError>;

    /// Persist a new record. Fails with [`StoreError::DuplicateKey`] if the id exists.
    async fn insert(&self, record: &Record) -> Result<(), StoreError>;

    /// Replace the snapshot and refresh time of an existing record.
    async fn replace_snapshot(
        &self, id: &str, snapshot: &CharacterSnapshot, refreshed_at: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    /// Most recently refreshed records first.
    async fn list(&self, limit: usize) -> Result<Vec<RecordSummary>, StoreError>;
}
