//! Prometheus-backed observation sink.
//!
//! Registers one vector per [`Metric`] in a private registry, so several
//! sinks can coexist in one process (tests, embedded use) without clashing
//! on the default registry.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, PoisonError};

use prometheus::{CounterVec, Encoder, GaugeVec, Opts, Registry, TextEncoder};

use super::observation::{Metric, MetricKind, Observation};
use super::sink::ObservationSink;

/// Errors from building or rendering a Prometheus sink.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),

    #[error("metrics encoding produced invalid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

enum Vector {
    Gauge(GaugeVec),
    Counter(CounterVec),
}

/// Observation sink exposing the Prometheus text format.
pub struct PrometheusSink {
    registry: Registry,
    vectors: HashMap<Metric, Vector>,
    /// Gauge series last written by `replace_gauges`, per character.
    published: Mutex<HashMap<String, HashSet<SeriesKey>>>,
}

type SeriesKey = (Metric, Vec<String>);

impl PrometheusSink {
    /// Create a sink with every metric registered.
    ///
    /// # Errors
    ///
    /// Returns an error if registration fails (e.g., an invalid metric name).
    pub fn new() -> Result<Self, SinkError> {
        let registry = Registry::new();
        let mut vectors = HashMap::with_capacity(Metric::ALL.len());

        for metric in Metric::ALL {
            let opts = Opts::new(metric.name(), metric.help());
            let vector = match metric.kind() {
                MetricKind::Gauge => {
                    let vec = GaugeVec::new(opts, metric.label_names())?;
                    registry.register(Box::new(vec.clone()))?;
                    Vector::Gauge(vec)
                }
                MetricKind::Counter => {
                    let vec = CounterVec::new(opts, metric.label_names())?;
                    registry.register(Box::new(vec.clone()))?;
                    Vector::Counter(vec)
                }
            };
            vectors.insert(metric, vector);
        }

        Ok(Self { registry, vectors, published: Mutex::default() })
    }

    /// Render all series in the Prometheus text exposition format.
    pub fn render(&self) -> Result<String, SinkError> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

impl ObservationSink for PrometheusSink {
    fn set_gauge(&self, metric: Metric, labels: &[&str], value: f64) {
        let Some(Vector::Gauge(vec)) = self.vectors.get(&metric) else {
            tracing::warn!(metric = metric.name(), "set_gauge on a metric that is not a gauge");
            return;
        };
        match vec.get_metric_with_label_values(labels) {
            Ok(gauge) => gauge.set(value),
            Err(e) => tracing::warn!(metric = metric.name(), error = %e, "dropping gauge sample"),
        }
    }

    fn increment_counter(&self, metric: Metric, labels: &[&str]) {
        let Some(Vector::Counter(vec)) = self.vectors.get(&metric) else {
            tracing::warn!(metric = metric.name(), "increment_counter on a metric that is not a counter");
            return;
        };
        match vec.get_metric_with_label_values(labels) {
            Ok(counter) => counter.inc(),
            Err(e) => tracing::warn!(metric = metric.name(), error = %e, "dropping counter sample"),
        }
    }

    fn replace_gauges(&self, character: &str, batch: &[Observation]) {
        let mut published = self.published.lock().unwrap_or_else(PoisonError::into_inner);
        let current: HashSet<SeriesKey> = batch.iter().map(|o| (o.metric, o.labels.clone())).collect();

        if let Some(previous) = published.get(character) {
            for (metric, labels) in previous.difference(&current) {
                let Some(Vector::Gauge(vec)) = self.vectors.get(metric) else { continue };
                let values: Vec<&str> = labels.iter().map(String::as_str).collect();
                if let Err(e) = vec.remove_label_values(&values) {
                    tracing::debug!(metric = metric.name(), error = %e, "stale gauge already gone");
                }
            }
        }

        for observation in batch {
            let labels: Vec<&str> = observation.labels.iter().map(String::as_str).collect();
            self.set_gauge(observation.metric, &labels, observation.value);
        }
        published.insert(character.to_string(), current);
    }
}
