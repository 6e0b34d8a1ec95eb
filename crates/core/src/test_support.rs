//! Shared fixtures and doubles for unit tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::parser::{ParseError, Parser};
use crate::record::{Record, RecordSummary};
use crate::snapshot::{Attributes, CharacterSnapshot, Header};
use crate::store::{RecordDb, RecordStore, StoreError};

pub fn sample_snapshot(name: &str, class: &str, level: u8) -> CharacterSnapshot {
    CharacterSnapshot {
        header: Header { name: name.to_string(), class: class.to_string(), level, status: 0 },
        attributes: Attributes { strength: 50, dexterity: 25, vitality: 30, energy: 35, ..Default::default() },
        skills: Vec::new(),
        equipped: Vec::new(),
        inventory: Vec::new(),
        corpse: Vec::new(),
        merc: Vec::new(),
        stash: None,
    }
}

/// Parser that returns a fixed snapshot, optionally after a delay, and counts calls.
pub struct StubParser {
    snapshot: CharacterSnapshot,
    delay: Option<Duration>,
    fail: AtomicBool,
    calls: AtomicUsize,
}

impl StubParser {
    pub fn new(snapshot: CharacterSnapshot) -> Arc<Self> {
        Arc::new(Self { snapshot, delay: None, fail: AtomicBool::new(false), calls: AtomicUsize::new(0) })
    }

    pub fn slow(snapshot: CharacterSnapshot, delay: Duration) -> Arc<Self> {
        Arc::new(Self { snapshot, delay: Some(delay), fail: AtomicBool::new(false), calls: AtomicUsize::new(0) })
    }

    pub fn failing() -> Arc<Self> {
        let parser = Self::new(sample_snapshot("Unused", "amazon", 1));
        parser.fail.store(true, Ordering::SeqCst);
        parser
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Parser for StubParser {
    async fn parse(&self, name: &str) -> Result<CharacterSnapshot, ParseError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(ParseError::NotFound(name.to_string()));
        }
        Ok(self.snapshot.clone())
    }
}

/// Which store operation a [`FaultyStore`] should fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    None,
    Find,
    /// `find` succeeds, but only after a long stall.
    SlowFind,
    Insert,
    Replace,
}

/// In-memory SQLite store that can be told to fail or stall one operation.
pub struct FaultyStore {
    pub inner: RecordDb,
    fault: Fault,
}

impl FaultyStore {
    pub async fn new(fault: Fault) -> Arc<Self> {
        let inner = RecordDb::open_in_memory().await.unwrap();
        Arc::new(Self { inner, fault })
    }

    fn injected(&self, op: Fault) -> Result<(), StoreError> {
        if self.fault == op {
            return Err(StoreError::Database(tokio_rusqlite::Error::ConnectionClosed));
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for FaultyStore {
    async fn find(&self, id: &str) -> Result<Option<Record>, StoreError> {
        self.injected(Fault::Find)?;
        if self.fault == Fault::SlowFind {
            tokio::time::sleep(Duration::from_secs(5)).await;
        }
        self.inner.find(id).await
    }

    async fn insert(&self, record: &Record) -> Result<(), StoreError> {
        self.injected(Fault::Insert)?;
        self.inner.insert(record).await
    }

    async fn replace_snapshot(
        &self, id: &str, snapshot: &CharacterSnapshot, refreshed_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        self.injected(Fault::Replace)?;
        self.inner.replace_snapshot(id, snapshot, refreshed_at).await
    }

    async fn list(&self, limit: usize) -> Result<Vec<RecordSummary>, StoreError> {
        self.inner.list(limit).await
    }
}
