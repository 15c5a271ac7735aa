//! Metric names, help texts, and the error-counter helper.

use camunda_client::HTTP_REQUESTS_TOTAL;
use camunda_sink::{labels, MetricKind, Registry, RegistryResult, Sink};

pub const HISTORY_INCIDENTS: &str = "camunda_history_incidents_total";
pub const ENGINE_METRICS: &str = "camunda_metrics_total";
pub const PROCESS_INSTANCES: &str = "camunda_process_instances_total";
pub const PROCESS_FAILED_JOBS: &str = "camunda_process_failed_jobs_total";
pub const ACTIVITY_INSTANCES: &str = "camunda_process_activity_instances_total";
pub const ACTIVITY_FAILED_JOBS: &str = "camunda_process_activity_failed_jobs_total";
pub const HISTORY_ACTIVITY_INSTANCES: &str = "camunda_history_process_activity_instances_total";
pub const HISTORY_ACTIVITY_CANCELED: &str = "camunda_history_process_activity_canceled_total";
pub const HISTORY_ACTIVITY_FINISHED: &str = "camunda_history_process_activity_finished_total";
pub const HISTORY_ACTIVITY_COMPLETE_SCOPE: &str =
    "camunda_history_process_activity_complete_scope_total";
pub const NAMED_ACTIVITIES: &str = "camunda_process_activities_total";
pub const SCRAPE_ERRORS: &str = "camunda_scrape_errors_total";
pub const SCRAPE_DURATION: &str = "camunda_scrape_duration_seconds";

// `name` label values of SCRAPE_ERRORS.
pub const ERR_INCIDENTS: &str = "incidents";
pub const ERR_METRICS: &str = "metrics";
pub const ERR_DEFINITION_STATISTICS: &str = "fetchProcessDefinitionStatistics";
pub const ERR_ACTIVITY_STATISTICS: &str = "fetchProcessDefinitionActivities";
pub const ERR_HISTORY_ACTIVITY_STATISTICS: &str = "fetchHistoryProcessDefinitionActivities";
pub const ERR_NAMED_ACTIVITIES: &str = "activities";

const DEFINITION: &[&str] = &[
    "id",
    "definitionId",
    "definitionKey",
    "definitionVersion",
    "deploymentId",
    "tenantId",
];
const ACTIVITY: &[&str] = &["activityId", "definitionId", "definitionKey", "definitionVersion"];

const CATALOGUE: &[(&str, MetricKind, &str, &[&str])] = &[
    (HISTORY_INCIDENTS, MetricKind::Gauge, "Number of history incidents within a Camunda server", &["status"]),
    (ENGINE_METRICS, MetricKind::Gauge, "Camunda metrics", &["name"]),
    (PROCESS_INSTANCES, MetricKind::Gauge, "Number of instances of a specific Process", DEFINITION),
    (PROCESS_FAILED_JOBS, MetricKind::Gauge, "Number of failed jobs for a specific Process", DEFINITION),
    (ACTIVITY_INSTANCES, MetricKind::Gauge, "Number of instances for a specific activity", ACTIVITY),
    (ACTIVITY_FAILED_JOBS, MetricKind::Gauge, "Number of failed jobs for a specific activity", ACTIVITY),
    (
        HISTORY_ACTIVITY_INSTANCES,
        MetricKind::Gauge,
        "Number of instances of a specific activity in the history",
        ACTIVITY,
    ),
    (
        HISTORY_ACTIVITY_CANCELED,
        MetricKind::Gauge,
        "Number of canceled activities for a specific activity in the history",
        ACTIVITY,
    ),
    (
        HISTORY_ACTIVITY_FINISHED,
        MetricKind::Gauge,
        "Number of finished activities for a specific activity in the history",
        ACTIVITY,
    ),
    (
        HISTORY_ACTIVITY_COMPLETE_SCOPE,
        MetricKind::Gauge,
        "Number of CompleteScope activities for a specific activity in the history",
        ACTIVITY,
    ),
    (
        NAMED_ACTIVITIES,
        MetricKind::Gauge,
        "Number of instances of a specific activity",
        &["activityId", "activityName", "definitionKey"],
    ),
    (SCRAPE_ERRORS, MetricKind::Counter, "Number of errors while accessing the Camunda APIs.", &["name"]),
    (SCRAPE_DURATION, MetricKind::Gauge, "Duration of a scrape in seconds", &["name"]),
    (HTTP_REQUESTS_TOTAL, MetricKind::Counter, "Number of Camunda API responses by status code.", &["code"]),
];

/// Register every metric family the exporter writes.
pub fn describe_metrics(registry: &Registry) -> RegistryResult<()> {
    for (name, kind, help, label_names) in CATALOGUE {
        registry.describe(name, *kind, help, label_names)?;
    }
    Ok(())
}

/// Increment `camunda_scrape_errors_total{name}`.
pub fn record_error(sink: &dyn Sink, name: &str) {
    sink.increment_counter(SCRAPE_ERRORS, &labels([("name", name)]));
}
