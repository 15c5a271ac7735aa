//! Engine metrics, read in two phases.
//!
//! The metrics endpoint returns interval buckets newest first. A single
//! result reveals the latest bucket's timestamp; a second request then
//! reads every metric of that bucket.

use tracing::debug;

use camunda_client::EngineClient;
use camunda_sink::{labels, Sink};

use crate::catalogue::{ENGINE_METRICS, ERR_METRICS};
use crate::error::{fetch_failed, CollectResult};

pub const STEP: &str = "engine_metrics";

/// Upper bound on metrics read from the latest bucket.
pub const BATCH_SIZE: usize = 100;

/// Set `camunda_metrics_total{name}` for the latest bucket.
///
/// Returns the number of metrics written. An engine that has not
/// reported any metrics yet yields `Ok(0)`.
pub async fn collect_engine_metrics(client: &EngineClient, sink: &dyn Sink) -> CollectResult<usize> {
    let probe = client
        .metrics(1, None)
        .await
        .map_err(|e| fetch_failed(sink, ERR_METRICS, STEP, e))?;

    let Some(latest) = probe.first() else {
        debug!("engine has not reported metrics yet");
        return Ok(0);
    };

    let batch = client
        .metrics(BATCH_SIZE, Some(&latest.timestamp))
        .await
        .map_err(|e| fetch_failed(sink, ERR_METRICS, STEP, e))?;

    debug!(count = batch.len(), timestamp = %latest.timestamp, "engine metrics");
    for metric in &batch {
        sink.set_gauge(
            ENGINE_METRICS,
            &labels([("name", metric.name.as_str())]),
            metric.value as f64,
        );
    }
    Ok(batch.len())
}
