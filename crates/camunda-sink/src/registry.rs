//! Labeled gauges and counters on top of a `prometheus::Registry`.
//!
//! Each family is a `GaugeVec` or `IntCounterVec` registered once, either
//! from the catalogue at startup or on its first write. Series inside a
//! vec are created and updated by the prometheus crate, so concurrent
//! cadences and the scrape reader never observe a half-written series.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, PoisonError, RwLock};

use prometheus::proto::MetricFamily;
use prometheus::{GaugeVec, IntCounterVec, Opts};
use tracing::{debug, warn};

/// Errors from registering a metric family.
pub type RegistryError = prometheus::Error;

/// Result type alias for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Label set identifying one series within a metric family.
pub type Labels = BTreeMap<String, String>;

/// Build a [`Labels`] map from `(name, value)` pairs.
pub fn labels<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Labels
where
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Write capability handed to collectors.
pub trait Sink: Send + Sync {
    /// Set a gauge, overwriting any previous value for the same labels.
    fn set_gauge(&self, name: &str, labels: &Labels, value: f64);

    /// Add one to a counter.
    fn increment_counter(&self, name: &str, labels: &Labels);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Gauge,
    Counter,
}

impl MetricKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Gauge => "gauge",
            MetricKind::Counter => "counter",
        }
    }
}

#[derive(Clone)]
enum Family {
    Gauge(GaugeVec),
    Counter(IntCounterVec),
}

impl Family {
    fn kind(&self) -> MetricKind {
        match self {
            Family::Gauge(_) => MetricKind::Gauge,
            Family::Counter(_) => MetricKind::Counter,
        }
    }
}

/// Thread-safe metric registry. Clones share the same storage.
#[derive(Clone, Default)]
pub struct Registry {
    inner: prometheus::Registry,
    families: Arc<RwLock<HashMap<String, Family>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a metric family with its type, help text and label names.
    ///
    /// Describing an existing family with the same type is a no-op; a
    /// different type is an error.
    pub fn describe(
        &self,
        name: &str,
        kind: MetricKind,
        help: &str,
        label_names: &[&str],
    ) -> RegistryResult<()> {
        let mut families = self.families.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = families.get(name) {
            if existing.kind() == kind {
                return Ok(());
            }
            return Err(RegistryError::Msg(format!(
                "metric {name} already registered as a {}",
                existing.kind().as_str()
            )));
        }

        let family = self.register(name, kind, help, label_names)?;
        families.insert(name.to_string(), family);
        Ok(())
    }

    /// Type of a registered family.
    pub fn kind(&self, name: &str) -> Option<MetricKind> {
        let families = self.families.read().unwrap_or_else(PoisonError::into_inner);
        families.get(name).map(Family::kind)
    }

    /// Current value of one series, if it has been written.
    pub fn value(&self, name: &str, labels: &Labels) -> Option<f64> {
        let family = self.gather().into_iter().find(|f| f.get_name() == name)?;
        let kind = self.kind(name)?;
        family
            .get_metric()
            .iter()
            .find(|metric| {
                let pairs = metric.get_label();
                pairs.len() == labels.len()
                    && pairs
                        .iter()
                        .all(|p| labels.get(p.get_name()).map(String::as_str) == Some(p.get_value()))
            })
            .map(|metric| match kind {
                MetricKind::Gauge => metric.get_gauge().get_value(),
                MetricKind::Counter => metric.get_counter().get_value(),
            })
    }

    /// Number of series currently held by a family.
    pub fn series_count(&self, name: &str) -> usize {
        self.gather()
            .iter()
            .find(|f| f.get_name() == name)
            .map(|f| f.get_metric().len())
            .unwrap_or(0)
    }

    /// Every family that holds at least one series, sorted by name.
    pub fn gather(&self) -> Vec<MetricFamily> {
        self.inner.gather()
    }

    fn register(
        &self,
        name: &str,
        kind: MetricKind,
        help: &str,
        label_names: &[&str],
    ) -> RegistryResult<Family> {
        let opts = Opts::new(name, help);
        let family = match kind {
            MetricKind::Gauge => {
                let vec = GaugeVec::new(opts, label_names)?;
                self.inner.register(Box::new(vec.clone()))?;
                Family::Gauge(vec)
            }
            MetricKind::Counter => {
                let vec = IntCounterVec::new(opts, label_names)?;
                self.inner.register(Box::new(vec.clone()))?;
                Family::Counter(vec)
            }
        };
        Ok(family)
    }

    /// Look up a family, registering it from the label names on first write.
    fn family(&self, name: &str, kind: MetricKind, labels: &Labels) -> Option<Family> {
        {
            let families = self.families.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(family) = families.get(name) {
                return Some(family.clone());
            }
        }

        let mut families = self.families.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(family) = families.get(name) {
            return Some(family.clone());
        }
        debug!(metric = %name, kind = kind.as_str(), "registering undescribed metric");
        let label_names: Vec<&str> = labels.keys().map(String::as_str).collect();
        match self.register(name, kind, name, &label_names) {
            Ok(family) => {
                families.insert(name.to_string(), family.clone());
                Some(family)
            }
            Err(e) => {
                warn!(metric = %name, error = %e, "could not register metric");
                None
            }
        }
    }
}

fn label_values(labels: &Labels) -> HashMap<&str, &str> {
    labels
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect()
}

impl Sink for Registry {
    fn set_gauge(&self, name: &str, labels: &Labels, value: f64) {
        match self.family(name, MetricKind::Gauge, labels) {
            Some(Family::Gauge(vec)) => match vec.get_metric_with(&label_values(labels)) {
                Ok(gauge) => gauge.set(value),
                Err(e) => warn!(metric = %name, error = %e, "gauge write with unexpected labels"),
            },
            Some(Family::Counter(_)) => {
                warn!(metric = %name, expected = "counter", "metric written with the wrong type, ignoring");
            }
            None => {}
        }
    }

    fn increment_counter(&self, name: &str, labels: &Labels) {
        match self.family(name, MetricKind::Counter, labels) {
            Some(Family::Counter(vec)) => match vec.get_metric_with(&label_values(labels)) {
                Ok(counter) => counter.inc(),
                Err(e) => warn!(metric = %name, error = %e, "counter write with unexpected labels"),
            },
            Some(Family::Gauge(_)) => {
                warn!(metric = %name, expected = "gauge", "metric written with the wrong type, ignoring");
            }
            None => {}
        }
    }
}
