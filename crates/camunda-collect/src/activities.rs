//! Historic instance counts for an operator-supplied list of activities.

use tracing::{debug, warn};

use camunda_client::EngineClient;
use camunda_core::ActivityConfig;
use camunda_sink::{labels, Sink};

use crate::catalogue::{record_error, ERR_NAMED_ACTIVITIES, NAMED_ACTIVITIES};
use crate::error::{CollectError, CollectResult};

pub const STEP: &str = "named_activities";

/// Set `camunda_process_activities_total{activityId, activityName, definitionKey}`
/// for every configured activity.
///
/// Same partial-failure policy as the incident collector.
pub async fn collect_named_activities(
    client: &EngineClient,
    sink: &dyn Sink,
    activities: &[ActivityConfig],
) -> CollectResult<()> {
    let mut failed = 0;

    for activity in activities {
        match client.activity_instance_count(&activity.id).await {
            Ok(count) => {
                debug!(activity = %activity.id, name = %activity.label, count, "activity count");
                sink.set_gauge(
                    NAMED_ACTIVITIES,
                    &labels([
                        ("activityId", activity.id.as_str()),
                        ("activityName", activity.label.as_str()),
                        ("definitionKey", activity.definition_key.as_str()),
                    ]),
                    count as f64,
                );
            }
            Err(e) => {
                warn!(activity = %activity.id, error = %e, "could not fetch activity count");
                record_error(sink, ERR_NAMED_ACTIVITIES);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        return Err(CollectError::Partial {
            step: STEP,
            failed,
            total: activities.len(),
        });
    }
    Ok(())
}
