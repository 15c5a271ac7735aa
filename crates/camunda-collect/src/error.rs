//! Collection error types.

use thiserror::Error;
use tracing::warn;

use camunda_client::ClientError;
use camunda_sink::Sink;

use crate::catalogue::record_error;

/// Result type alias for collection steps.
pub type CollectResult<T> = Result<T, CollectError>;

/// Why a collection step reported failure.
///
/// By the time one of these reaches the scheduler the error counter has
/// already been incremented and the cause logged.
#[derive(Debug, Error)]
pub enum CollectError {
    #[error("{step}: {source}")]
    Fetch {
        step: &'static str,
        #[source]
        source: ClientError,
    },

    #[error("{step}: {failed} of {total} items failed")]
    Partial {
        step: &'static str,
        failed: usize,
        total: usize,
    },
}

impl CollectError {
    pub fn step(&self) -> &'static str {
        match self {
            CollectError::Fetch { step, .. } | CollectError::Partial { step, .. } => step,
        }
    }
}

/// Count and log a transport failure, then wrap it.
pub(crate) fn fetch_failed(
    sink: &dyn Sink,
    counter: &str,
    step: &'static str,
    source: ClientError,
) -> CollectError {
    warn!(step, error = %source, "engine fetch failed");
    record_error(sink, counter);
    CollectError::Fetch { step, source }
}
