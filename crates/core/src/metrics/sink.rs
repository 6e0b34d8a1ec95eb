//! Observation sinks.
//!
//! A sink is the metrics registry observations are written into. It is
//! injected into the orchestrator rather than reached through global state.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::observation::{Metric, MetricKind, Observation};

/// Destination for gauges and counters.
///
/// `labels` are values ordered as in [`Metric::label_names`]. Implementations
/// must be safe to call concurrently and keep last-write-wins semantics per
/// `(metric, labels)` for gauges.
pub trait ObservationSink: Send + Sync {
    fn set_gauge(&self, metric: Metric, labels: &[&str], value: f64);

    fn increment_counter(&self, metric: Metric, labels: &[&str]);

    /// Make `batch` the complete gauge state of `character`.
    ///
    /// Gauge series whose first label is `character` and which are absent
    /// from `batch` are removed. Counters are untouched.
    fn replace_gauges(&self, character: &str, batch: &[Observation]);
}

type SeriesKey = (Metric, Vec<String>);

/// In-process sink that keeps the latest value of every series.
#[derive(Debug, Default)]
pub struct MemorySink {
    series: Mutex<BTreeMap<SeriesKey, f64>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<SeriesKey, f64>> {
        self.series.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn key(metric: Metric, labels: &[&str]) -> SeriesKey {
        (metric, labels.iter().map(|l| l.to_string()).collect())
    }

    /// Current value of a series, if it has ever been written.
    pub fn value(&self, metric: Metric, labels: &[&str]) -> Option<f64> {
        self.lock().get(&Self::key(metric, labels)).copied()
    }

    /// Counter value, zero if never incremented.
    pub fn count(&self, metric: Metric, labels: &[&str]) -> u64 {
        self.value(metric, labels).unwrap_or(0.0) as u64
    }

    /// Number of distinct series written.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Copy of every series, ordered by metric then labels.
    pub fn snapshot(&self) -> Vec<(Metric, Vec<String>, f64)> {
        self.lock()
            .iter()
            .map(|((metric, labels), value)| (*metric, labels.clone(), *value))
            .collect()
    }
}

impl ObservationSink for MemorySink {
    fn set_gauge(&self, metric: Metric, labels: &[&str], value: f64) {
        self.lock().insert(Self::key(metric, labels), value);
    }

    fn increment_counter(&self, metric: Metric, labels: &[&str]) {
        *self.lock().entry(Self::key(metric, labels)).or_insert(0.0) += 1.0;
    }

    fn replace_gauges(&self, character: &str, batch: &[Observation]) {
        let mut series = self.lock();
        series.retain(|(metric, labels), _| {
            metric.kind() == MetricKind::Counter || labels.first().map(String::as_str) != Some(character)
        });
        for observation in batch {
            series.insert((observation.metric, observation.labels.clone()), observation.value);
        }
    }
}
