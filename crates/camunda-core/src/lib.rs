//! camunda-core: shared types for camunda-exporter.
//!
//! Holds the JSON records returned by the engine REST API, the optional
//! TOML config file, and the duration parser used by the CLI.

pub mod config;
pub mod types;

pub use config::{ActivityConfig, ExporterFile, parse_duration, DEFAULT_INCIDENT_STATUSES, MAX_DURATION};
pub use types::*;
