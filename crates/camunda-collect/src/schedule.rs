//! Cadence loops.
//!
//! Each cadence runs in its own task on a fixed period. The tasks share
//! nothing but the sink. A tick that outlasts its period delays the
//! next one; missed ticks are skipped, never queued.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::error::CollectResult;
use crate::pipeline::{Cadence, Pipeline};

/// Drives a [`Pipeline`] on the short and long cadences.
pub struct Scheduler {
    pipeline: Arc<Pipeline>,
    short_interval: Duration,
    long_interval: Duration,
}

impl Scheduler {
    pub fn new(pipeline: Arc<Pipeline>, short_interval: Duration, long_interval: Duration) -> Self {
        Self {
            pipeline,
            short_interval,
            long_interval,
        }
    }

    /// Run both cadences once. The caller must not serve on failure.
    pub async fn initial_pass(&self) -> CollectResult<()> {
        info!("fetching initial metrics");
        self.pipeline.initial_pass().await
    }

    /// Spawn one loop per cadence. Loops stop when `shutdown` flips.
    pub fn spawn(&self, shutdown: watch::Receiver<bool>) -> Vec<JoinHandle<()>> {
        [
            (Cadence::Short, self.short_interval),
            (Cadence::Long, self.long_interval),
        ]
        .into_iter()
        .map(|(cadence, period)| {
            let pipeline = Arc::clone(&self.pipeline);
            let shutdown = shutdown.clone();
            tokio::spawn(run_cadence_loop(pipeline, cadence, period, shutdown))
        })
        .collect()
    }
}

/// Tick `cadence` every `period` until shutdown.
///
/// The first tick fires one period after start; the initial pass covers
/// time zero. Failures are logged and never end the loop. A period too
/// large to schedule is logged as an error and the loop returns at once.
pub async fn run_cadence_loop(
    pipeline: Arc<Pipeline>,
    cadence: Cadence,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    info!(
        cadence = cadence.as_str(),
        period_ms = period.as_millis() as u64,
        "cadence started"
    );

    let Some(start) = Instant::now().checked_add(period) else {
        error!(
            cadence = cadence.as_str(),
            period_ms = period.as_millis() as u64,
            "cadence period out of range, cadence not scheduled"
        );
        return;
    };
    let mut interval = tokio::time::interval_at(start, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                match pipeline.run_cadence(cadence).await {
                    Ok(()) => debug!(cadence = cadence.as_str(), "tick complete"),
                    Err(e) => warn!(cadence = cadence.as_str(), error = %e, "tick failed, keeping last values"),
                }
            }
            _ = shutdown.changed() => {
                info!(cadence = cadence.as_str(), "cadence shutting down");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camunda_client::{ClientConfig, EngineClient};
    use camunda_sink::Registry;

    use crate::pipeline::CollectOptions;

    fn pipeline() -> Arc<Pipeline> {
        let registry = Arc::new(Registry::new());
        let client = EngineClient::new(ClientConfig::new("http://127.0.0.1:1"), registry.clone())
            .unwrap();
        Arc::new(Pipeline::new(client, registry, CollectOptions::default()))
    }

    #[tokio::test]
    async fn unschedulable_period_returns_instead_of_panicking() {
        let (_tx, rx) = watch::channel(false);
        let handle = tokio::spawn(run_cadence_loop(pipeline(), Cadence::Long, Duration::MAX, rx));

        let joined = tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("loop should return promptly");
        assert!(joined.is_ok(), "loop task panicked");
    }

    #[tokio::test]
    async fn loop_stops_on_shutdown() {
        let (tx, rx) = watch::channel(false);
        let handle = tokio::spawn(run_cadence_loop(
            pipeline(),
            Cadence::Short,
            Duration::from_millis(10),
            rx,
        ));

        tokio::time::sleep(Duration::from_millis(50)).await;
        tx.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("loop should stop")
            .unwrap();
    }
}
