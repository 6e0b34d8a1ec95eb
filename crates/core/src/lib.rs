//! Core types and shared functionality for armory.
//!
//! This crate provides:
//! - The refresh orchestrator that keeps character records fresh
//! - Metrics projection from a record into labeled observations
//! - Record storage with a SQLite backend
//! - Name validation, status labels and the unified error type
//! - Configuration structures

pub mod config;
pub mod error;
pub mod metrics;
pub mod name;
pub mod parser;
pub mod record;
pub mod resolve;
pub mod snapshot;
pub mod status;
pub mod store;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::{ArmoryConfig, ConfigError, ParserSource};
pub use error::{Error, WriteOp};
pub use metrics::{MemorySink, MetricsProjector, ObservationSink, PrometheusSink};
pub use parser::{ParseError, Parser};
pub use record::{Record, RecordSummary};
pub use resolve::{Orchestrator, Resolved};
pub use snapshot::CharacterSnapshot;
pub use status::ResolveStatus;
pub use store::{RecordDb, RecordStore, StoreError};
