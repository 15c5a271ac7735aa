//! camunda-sink: the measurement sink for camunda-exporter.
//!
//! Collectors write labeled gauges and counters through the [`Sink`]
//! trait; the scrape handler renders everything in the Prometheus text
//! exposition format.
//!
//! # Architecture
//!
//! ```text
//! Registry (prometheus::Registry + family map, implements Sink)
//!   ├── describe()            ← metric catalogue registered at startup
//!   ├── set_gauge()           ← collectors, overwrite semantics
//!   ├── increment_counter()   ← transport + collectors, cumulative
//!   └── gather()              → render_prometheus() → /metrics
//! ```

pub mod exposition;
pub mod registry;

pub use exposition::{render_prometheus, CONTENT_TYPE};
pub use registry::{labels, Labels, MetricKind, Registry, RegistryError, RegistryResult, Sink};
