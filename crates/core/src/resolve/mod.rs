//! Freshness-gated refresh orchestration.
//!
//! [`Orchestrator::resolve`] decides per call whether to serve the cached
//! record, refresh it, or create it:
//!
//! - Invalid names are rejected before touching the store
//! - Unknown ids are parsed and inserted
//! - Records younger than the ttl are served as-is
//! - Stale records are parsed again and their snapshot replaced
//!
//! Concurrent calls for the same id join the resolve already in flight.
//! Every call records exactly one status on the resolves counter, and every
//! successful call projects the record into the sink.

mod flight;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::TimeDelta;
use tokio_util::sync::CancellationToken;

use crate::error::{Error, WriteOp};
use crate::metrics::{Metric, MetricsProjector, ObservationSink};
use crate::name;
use crate::parser::Parser;
use crate::record::{self, Record};
use crate::snapshot::CharacterSnapshot;
use crate::status::ResolveStatus;
use crate::store::RecordStore;

use flight::Flights;

/// A resolved record together with how it was obtained.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub record: Record,
    /// Either [`ResolveStatus::Cached`] or [`ResolveStatus::Success`].
    pub status: ResolveStatus,
}

/// Resolves character ids against a parser and a record store.
pub struct Orchestrator {
    parser: Arc<dyn Parser>,
    store: Arc<dyn RecordStore>,
    sink: Arc<dyn ObservationSink>,
    projector: MetricsProjector,
    flights: Flights,
}

impl Orchestrator {
    pub fn new(parser: Arc<dyn Parser>, store: Arc<dyn RecordStore>, sink: Arc<dyn ObservationSink>) -> Self {
        Self { parser, store, sink, projector: MetricsProjector::new(), flights: Flights::default() }
    }

    /// Replace the projector, e.g. to supply class-aware tables.
    pub fn with_projector(mut self, projector: MetricsProjector) -> Self {
        self.projector = projector;
        self
    }

    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    /// Resolve `id` to a record no older than `ttl`.
    pub async fn resolve(&self, id: &str, ttl: Duration, cancel: &CancellationToken) -> Result<Record, Error> {
        self.resolve_detailed(id, ttl, cancel).await.map(|resolved| resolved.record)
    }

    /// Like [`Orchestrator::resolve`], also reporting whether the record was
    /// served from cache.
    pub async fn resolve_detailed(
        &self, id: &str, ttl: Duration, cancel: &CancellationToken,
    ) -> Result<Resolved, Error> {
        let (outcome, led) = if name::is_valid(id) {
            self.flights.run(id, cancel, || self.refresh(id, ttl, cancel)).await
        } else {
            (Err(Error::InvalidIdentifier(id.to_string())), true)
        };

        self.report(id, &outcome, !led);
        outcome
    }

    fn report(&self, id: &str, outcome: &Result<Resolved, Error>, joined: bool) {
        let status = match outcome {
            Ok(resolved) => resolved.status,
            Err(e) => e.status(),
        };
        self.sink.increment_counter(Metric::Resolves, &[id, status.as_str()]);

        match outcome {
            Ok(resolved) => {
                self.sink.replace_gauges(id, &self.projector.project(&resolved.record));
                tracing::debug!(
                    character = id,
                    %status,
                    joined,
                    age_ms = resolved.record.age(record::now()).num_milliseconds(),
                    "resolved"
                );
            }
            Err(e) => tracing::warn!(character = id, %status, joined, error = %e, "resolve failed"),
        }
    }

    async fn refresh(&self, id: &str, ttl: Duration, cancel: &CancellationToken) -> Result<Resolved, Error> {
        let existing = guarded(cancel, id, "find", self.store.find(id))
            .await?
            .map_err(|e| Error::StoreUnavailable(e.to_string()))?;

        match existing {
            None => {
                let snapshot = self.parse(id, cancel).await?;
                let record = Record::new(id, snapshot, record::now());
                ensure_live(cancel, id, WriteOp::Insert)?;
                self.store
                    .insert(&record)
                    .await
                    .map_err(|e| Error::PersistFailed { op: WriteOp::Insert, message: e.to_string() })?;
                Ok(Resolved { record, status: ResolveStatus::Success })
            }
            Some(record) if !record.is_stale(ttl, record::now()) => {
                Ok(Resolved { record, status: ResolveStatus::Cached })
            }
            Some(stale) => {
                let snapshot = self.parse(id, cancel).await?;
                // Refresh times must move forward even if the clock does not.
                let floor = stale
                    .last_refreshed_at
                    .checked_add_signed(TimeDelta::microseconds(1))
                    .unwrap_or(stale.last_refreshed_at);
                let refreshed_at = record::now().max(floor);
                ensure_live(cancel, id, WriteOp::Replace)?;
                self.store
                    .replace_snapshot(id, &snapshot, refreshed_at)
                    .await
                    .map_err(|e| Error::PersistFailed { op: WriteOp::Replace, message: e.to_string() })?;
                Ok(Resolved { record: Record::new(id, snapshot, refreshed_at), status: ResolveStatus::Success })
            }
        }
    }

    async fn parse(&self, id: &str, cancel: &CancellationToken) -> Result<CharacterSnapshot, Error> {
        guarded(cancel, id, "parse", self.parser.parse(id))
            .await?
            .map_err(|e| Error::ParseFailed(e.to_string()))
    }
}

/// Await `work` unless `cancel` fires first.
async fn guarded<T>(cancel: &CancellationToken, id: &str, stage: &str, work: impl Future<Output = T>) -> Result<T, Error> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(Error::Cancelled(format!("{id}: {stage}"))),
        out = work => Ok(out),
    }
}

/// Writes are single statements; once started they run to completion.
fn ensure_live(cancel: &CancellationToken, id: &str, op: WriteOp) -> Result<(), Error> {
    if cancel.is_cancelled() {
        return Err(Error::Cancelled(format!("{id}: before {op}")));
    }
    Ok(())
}
