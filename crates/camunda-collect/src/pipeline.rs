//! Cadences and the ordered steps they run.

use std::sync::Arc;

use tracing::debug;

use camunda_client::EngineClient;
use camunda_core::{ActivityConfig, DEFAULT_INCIDENT_STATUSES};
use camunda_sink::Sink;

use crate::error::CollectResult;
use crate::timing::measure;
use crate::{activities, engine_metrics, incidents, statistics};

/// Which collectors are enabled and what static data they use.
#[derive(Debug, Clone)]
pub struct CollectOptions {
    /// Process-definition and runtime activity statistics.
    pub fetch_runtime: bool,
    /// History incidents and historic activity statistics.
    pub fetch_history: bool,
    /// Engine metrics.
    pub fetch_metrics: bool,
    pub incident_statuses: Vec<String>,
    pub activities: Vec<ActivityConfig>,
}

impl Default for CollectOptions {
    fn default() -> Self {
        Self {
            fetch_runtime: false,
            fetch_history: false,
            fetch_metrics: false,
            incident_statuses: DEFAULT_INCIDENT_STATUSES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            activities: Vec::new(),
        }
    }
}

/// The two polling cadences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cadence {
    Short,
    Long,
}

impl Cadence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Cadence::Short => "short",
            Cadence::Long => "long",
        }
    }
}

/// One timed unit of a cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    HistoryIncidents,
    ProcessDefinitionStatistics,
    NamedActivities,
    EngineMetrics,
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Step::HistoryIncidents => incidents::STEP,
            Step::ProcessDefinitionStatistics => statistics::STEP,
            Step::NamedActivities => activities::STEP,
            Step::EngineMetrics => engine_metrics::STEP,
        }
    }
}

/// Runs collectors against one engine, writing into one sink.
pub struct Pipeline {
    client: EngineClient,
    sink: Arc<dyn Sink>,
    options: CollectOptions,
}

impl Pipeline {
    pub fn new(client: EngineClient, sink: Arc<dyn Sink>, options: CollectOptions) -> Self {
        Self {
            client,
            sink,
            options,
        }
    }

    pub fn options(&self) -> &CollectOptions {
        &self.options
    }

    /// The enabled steps of a cadence, in execution order.
    pub fn steps(&self, cadence: Cadence) -> Vec<Step> {
        let mut steps = Vec::new();
        match cadence {
            Cadence::Short => {
                if self.options.fetch_history {
                    steps.push(Step::HistoryIncidents);
                }
                if self.options.fetch_runtime {
                    steps.push(Step::ProcessDefinitionStatistics);
                }
                if !self.options.activities.is_empty() {
                    steps.push(Step::NamedActivities);
                }
            }
            Cadence::Long => {
                if self.options.fetch_metrics {
                    steps.push(Step::EngineMetrics);
                }
            }
        }
        steps
    }

    /// Run a single step without timing it.
    pub async fn run_step(&self, step: Step) -> CollectResult<()> {
        let sink = self.sink.as_ref();
        match step {
            Step::HistoryIncidents => {
                incidents::collect_history_incidents(
                    &self.client,
                    sink,
                    &self.options.incident_statuses,
                )
                .await
            }
            Step::ProcessDefinitionStatistics => {
                statistics::collect_process_definition_statistics(
                    &self.client,
                    sink,
                    self.options.fetch_history,
                )
                .await
            }
            Step::NamedActivities => {
                activities::collect_named_activities(&self.client, sink, &self.options.activities)
                    .await
            }
            Step::EngineMetrics => engine_metrics::collect_engine_metrics(&self.client, sink)
                .await
                .map(|_| ()),
        }
    }

    /// Run every enabled step of a cadence in order.
    ///
    /// A failing step does not stop the ones after it; the first failure
    /// is returned once all have run.
    pub async fn run_cadence(&self, cadence: Cadence) -> CollectResult<()> {
        let sink = self.sink.as_ref();
        measure(sink, cadence.as_str(), async {
            let mut first_error = None;
            for step in self.steps(cadence) {
                if let Err(e) = measure(sink, step.name(), self.run_step(step)).await {
                    debug!(cadence = cadence.as_str(), step = step.name(), error = %e, "step failed");
                    first_error.get_or_insert(e);
                }
            }
            match first_error {
                Some(e) => Err(e),
                None => Ok(()),
            }
        })
        .await
    }

    /// The mandatory startup pass: short cadence, then long.
    pub async fn initial_pass(&self) -> CollectResult<()> {
        self.run_cadence(Cadence::Short).await?;
        self.run_cadence(Cadence::Long).await
    }
}
