//! camunda-collect: the collection pipeline.
//!
//! Each collector fetches one engine resource through [`EngineClient`]
//! and writes labeled measurements into a [`Sink`]. The [`Pipeline`]
//! groups collectors into two cadences; [`Scheduler`] runs the mandatory
//! initial pass and then one background loop per cadence.
//!
//! # Architecture
//!
//! ```text
//! Scheduler
//!   ├── initial_pass()      short, then long; any failure is fatal
//!   └── spawn()             one task per cadence
//!         └── Pipeline::run_cadence()
//!               ├── Short: history incidents → definition statistics
//!               │          (→ activity statistics per definition) → named activities
//!               └── Long:  engine metrics
//! ```
//!
//! Every step and every whole tick is timed into
//! `camunda_scrape_duration_seconds{name}`.
//!
//! [`EngineClient`]: camunda_client::EngineClient
//! [`Sink`]: camunda_sink::Sink

pub mod activities;
pub mod catalogue;
pub mod engine_metrics;
pub mod error;
pub mod incidents;
pub mod pipeline;
pub mod schedule;
pub mod statistics;
pub mod timing;

pub use catalogue::describe_metrics;
pub use error::{CollectError, CollectResult};
pub use pipeline::{Cadence, CollectOptions, Pipeline, Step};
pub use schedule::Scheduler;
pub use timing::measure;
