//! History incident counts by status.

use tracing::{debug, warn};

use camunda_client::EngineClient;
use camunda_sink::{labels, Sink};

use crate::catalogue::{record_error, ERR_INCIDENTS, HISTORY_INCIDENTS};
use crate::error::{CollectError, CollectResult};

pub const STEP: &str = "history_incidents";

/// Set `camunda_history_incidents_total{status}` for every status.
///
/// A failing status is counted and skipped; the others are still
/// collected and the step then reports [`CollectError::Partial`].
pub async fn collect_history_incidents(
    client: &EngineClient,
    sink: &dyn Sink,
    statuses: &[String],
) -> CollectResult<()> {
    let mut failed = 0;

    for status in statuses {
        match client.history_incident_count(status).await {
            Ok(count) => {
                debug!(%status, count, "history incidents");
                sink.set_gauge(
                    HISTORY_INCIDENTS,
                    &labels([("status", status.as_str())]),
                    count as f64,
                );
            }
            Err(e) => {
                warn!(%status, error = %e, "could not fetch incident count");
                record_error(sink, ERR_INCIDENTS);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        return Err(CollectError::Partial {
            step: STEP,
            failed,
            total: statuses.len(),
        });
    }
    Ok(())
}
