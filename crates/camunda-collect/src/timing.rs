//! Wall-clock timing of collection units.

use std::future::Future;
use std::time::Instant;

use tracing::debug;

use camunda_sink::{labels, Sink};

use crate::catalogue::SCRAPE_DURATION;

/// Await `work`, record its elapsed seconds into
/// `camunda_scrape_duration_seconds{name}`, and return its output as is.
pub async fn measure<F>(sink: &dyn Sink, name: &str, work: F) -> F::Output
where
    F: Future,
{
    debug!(unit = %name, "measuring");
    let start = Instant::now();
    let output = work.await;
    let elapsed = start.elapsed();

    sink.set_gauge(SCRAPE_DURATION, &labels([("name", name)]), elapsed.as_secs_f64());
    debug!(unit = %name, elapsed_ms = elapsed.as_millis() as u64, "measured");
    output
}
