//! Transport error types.

use thiserror::Error;

/// Result type alias for engine requests.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors surfaced by [`EngineClient`](crate::EngineClient).
///
/// Callers only distinguish success from failure; the variants exist for
/// log lines.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid server url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("failed to build http client: {0}")]
    Build(#[source] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} => {status}")]
    Status { url: String, status: u16 },

    #[error("invalid json from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}
