//! Process-definition and per-definition activity statistics.
//!
//! Label sets for a definition are always built from
//! [`definition_labels`], so definition-level and activity-level series
//! share the same `definitionId`/`definitionKey`/`definitionVersion`.

use tracing::{debug, warn};

use camunda_client::EngineClient;
use camunda_core::{ProcessDefinition, ProcessDefinitionStatistics};
use camunda_sink::{Labels, Sink};

use crate::catalogue::*;
use crate::error::{fetch_failed, CollectError, CollectResult};

pub const STEP: &str = "process_definition_statistics";
pub const ACTIVITY_STEP: &str = "activity_statistics";
pub const HISTORY_ACTIVITY_STEP: &str = "history_activity_statistics";

/// Identity labels of a process definition.
pub fn definition_labels(definition: &ProcessDefinition) -> Labels {
    let mut labels = Labels::new();
    labels.insert("definitionId".to_string(), definition.id.clone());
    labels.insert("definitionKey".to_string(), definition.key.clone());
    labels.insert("definitionVersion".to_string(), definition.version.to_string());
    labels
}

/// Labels of the definition-level instance and failed-job gauges.
pub fn statistics_labels(stat: &ProcessDefinitionStatistics) -> Labels {
    let definition = &stat.definition;
    let mut labels = definition_labels(definition);
    labels.insert("id".to_string(), stat.id.clone());
    labels.insert(
        "deploymentId".to_string(),
        definition.deployment_id.clone().unwrap_or_default(),
    );
    labels.insert(
        "tenantId".to_string(),
        definition.tenant_id.clone().unwrap_or_default(),
    );
    labels
}

/// Labels of one activity within a definition.
pub fn activity_labels(definition: &ProcessDefinition, activity_id: &str) -> Labels {
    let mut labels = definition_labels(definition);
    labels.insert("activityId".to_string(), activity_id.to_string());
    labels
}

/// Collect statistics for every non-suspended process definition.
///
/// Failing to read the definition list aborts the step. A failure inside
/// one definition's activity statistics is counted, and collection moves
/// on to the next definition; the step then reports
/// [`CollectError::Partial`].
pub async fn collect_process_definition_statistics(
    client: &EngineClient,
    sink: &dyn Sink,
    fetch_history: bool,
) -> CollectResult<()> {
    let stats = client
        .process_definition_statistics()
        .await
        .map_err(|e| fetch_failed(sink, ERR_DEFINITION_STATISTICS, STEP, e))?;
    debug!(count = stats.len(), "process definition statistics");

    let mut active = 0;
    let mut failed = 0;

    for stat in &stats {
        if stat.definition.suspended {
            debug!(definition = %stat.definition, "skipping suspended definition");
            continue;
        }
        active += 1;

        let labels = statistics_labels(stat);
        sink.set_gauge(PROCESS_INSTANCES, &labels, stat.instances as f64);
        sink.set_gauge(PROCESS_FAILED_JOBS, &labels, stat.failed_jobs as f64);
        debug!(
            definition = %stat.definition,
            instances = stat.instances,
            failed_jobs = stat.failed_jobs,
            "definition statistics"
        );

        if let Err(e) =
            collect_activity_statistics(client, sink, &stat.definition, fetch_history).await
        {
            warn!(definition = %stat.definition, error = %e, "activity statistics incomplete");
            failed += 1;
        }
    }

    if failed > 0 {
        return Err(CollectError::Partial {
            step: STEP,
            failed,
            total: active,
        });
    }
    Ok(())
}

/// Collect runtime, and optionally historic, activity statistics for one
/// definition.
pub async fn collect_activity_statistics(
    client: &EngineClient,
    sink: &dyn Sink,
    definition: &ProcessDefinition,
    fetch_history: bool,
) -> CollectResult<()> {
    let runtime = client
        .activity_statistics(&definition.id)
        .await
        .map_err(|e| fetch_failed(sink, ERR_ACTIVITY_STATISTICS, ACTIVITY_STEP, e))?;
    debug!(definition = %definition, count = runtime.len(), "runtime activities");

    for stat in &runtime {
        let labels = activity_labels(definition, &stat.activity_id);
        sink.set_gauge(ACTIVITY_INSTANCES, &labels, stat.instances as f64);
        sink.set_gauge(ACTIVITY_FAILED_JOBS, &labels, stat.failed_jobs as f64);
    }

    if !fetch_history {
        return Ok(());
    }

    let history = client
        .history_activity_statistics(&definition.id)
        .await
        .map_err(|e| {
            fetch_failed(sink, ERR_HISTORY_ACTIVITY_STATISTICS, HISTORY_ACTIVITY_STEP, e)
        })?;
    debug!(definition = %definition, count = history.len(), "history activities");

    for stat in &history {
        let labels = activity_labels(definition, &stat.activity_id);
        sink.set_gauge(HISTORY_ACTIVITY_INSTANCES, &labels, stat.instances as f64);
        sink.set_gauge(HISTORY_ACTIVITY_CANCELED, &labels, stat.canceled as f64);
        sink.set_gauge(HISTORY_ACTIVITY_FINISHED, &labels, stat.finished as f64);
        sink.set_gauge(HISTORY_ACTIVITY_COMPLETE_SCOPE, &labels, stat.complete_scope as f64);
    }
    Ok(())
}
