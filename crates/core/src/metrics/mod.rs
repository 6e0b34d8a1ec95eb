//! Metrics projection and observation sinks.
//!
//! - [`MetricsProjector`] derives gauge observations from a record
//! - [`ObservationSink`] is where observations are written
//! - [`MemorySink`] and [`PrometheusSink`] are the bundled sinks

pub mod observation;
pub mod projector;
pub mod registry;
pub mod sink;

pub use observation::{Metric, MetricKind, Observation};
pub use projector::{ClassTables, DefaultTables, MetricsProjector, QualityBucket, UNKNOWN_TREE};
pub use registry::{PrometheusSink, SinkError};
pub use sink::{MemorySink, ObservationSink};
