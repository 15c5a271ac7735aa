//! The engine HTTP client.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::debug;

use camunda_sink::{labels, Sink};

use crate::error::{ClientError, ClientResult};

/// Total time allowed for one request, connect through body.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Counter of engine responses, labeled by HTTP status code.
pub const HTTP_REQUESTS_TOTAL: &str = "camunda_http_requests_total";

/// Where and how to reach the engine.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL, e.g. `http://camunda:8080`.
    pub server: String,
    /// Path prefix below the server, e.g. `rest` or `engine-rest`.
    pub rest_prefix: String,
    pub user: Option<String>,
    pub password: Option<String>,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(server: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            rest_prefix: "rest".to_string(),
            user: None,
            password: None,
            timeout: REQUEST_TIMEOUT,
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.rest_prefix = prefix.into();
        self
    }

    pub fn with_credentials(mut self, user: Option<String>, password: Option<String>) -> Self {
        self.user = user;
        self.password = password;
        self
    }

    /// Override the request timeout (for testing).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// GETs JSON from the engine REST API.
///
/// Cheap to clone; clones share the connection pool and the sink.
#[derive(Clone)]
pub struct EngineClient {
    http: reqwest::Client,
    config: ClientConfig,
    sink: Arc<dyn Sink>,
}

impl EngineClient {
    /// Create a client. Fails if `config.server` is not an absolute URL.
    pub fn new(config: ClientConfig, sink: Arc<dyn Sink>) -> ClientResult<Self> {
        let parsed = url::Url::parse(&config.server).map_err(|e| ClientError::InvalidUrl {
            url: config.server.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::InvalidUrl {
                url: config.server.clone(),
                reason: format!("unsupported scheme {:?}", parsed.scheme()),
            });
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("camunda-exporter/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ClientError::Build)?;

        Ok(Self { http, config, sink })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Build the full URL for an API path.
    ///
    /// Absolute URLs are returned unchanged so callers that still carry a
    /// complete `http://host/engine-rest/...` keep working.
    pub fn resolve_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }

        let mut url = self.config.server.trim_end_matches('/').to_string();
        let prefix = self.config.rest_prefix.trim_matches('/');
        if !prefix.is_empty() {
            url.push('/');
            url.push_str(prefix);
        }
        url.push('/');
        url.push_str(path.trim_start_matches('/'));
        url
    }

    /// GET `path` and decode the `200` body as `T`.
    pub async fn fetch_json<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let url = self.resolve_url(path);

        let mut request = self.http.get(&url).header(ACCEPT, "application/json");
        if let Some(user) = &self.config.user {
            request = request.basic_auth(user, self.config.password.as_deref());
        }

        let response = request.send().await.map_err(|source| ClientError::Request {
            url: url.clone(),
            source,
        })?;

        let status = response.status();
        self.sink.increment_counter(
            HTTP_REQUESTS_TOTAL,
            &labels([("code", status.as_u16().to_string())]),
        );
        debug!(%url, status = status.as_u16(), "engine response");

        if status != StatusCode::OK {
            return Err(ClientError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|source| ClientError::Request {
            url: url.clone(),
            source,
        })?;
        serde_json::from_slice(&body).map_err(|source| ClientError::Decode { url, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camunda_sink::Registry;

    fn client(server: &str, prefix: &str) -> EngineClient {
        let config = ClientConfig::new(server).with_prefix(prefix);
        EngineClient::new(config, Arc::new(Registry::new())).unwrap()
    }

    #[test]
    fn resolve_joins_server_prefix_and_path() {
        let c = client("http://camunda:8080", "rest");
        assert_eq!(
            c.resolve_url("history/incident/count?open=true"),
            "http://camunda:8080/rest/history/incident/count?open=true"
        );
    }

    #[test]
    fn resolve_trims_redundant_slashes() {
        let c = client("http://camunda:8080/", "/engine-rest/");
        assert_eq!(
            c.resolve_url("/metrics?maxResults=1"),
            "http://camunda:8080/engine-rest/metrics?maxResults=1"
        );
    }

    #[test]
    fn resolve_without_prefix() {
        let c = client("http://camunda:8080", "");
        assert_eq!(c.resolve_url("metrics"), "http://camunda:8080/metrics");
    }

    #[test]
    fn resolve_passes_absolute_urls_through() {
        let c = client("http://camunda:8080", "rest");
        let legacy = "https://other-host/engine-rest/history/incident/count?open=true";
        assert_eq!(c.resolve_url(legacy), legacy);
    }

    #[test]
    fn new_rejects_relative_server() {
        let result = EngineClient::new(ClientConfig::new("camunda:8080/rest"), Arc::new(Registry::new()));
        assert!(matches!(result, Err(ClientError::InvalidUrl { .. })));

        let result = EngineClient::new(ClientConfig::new("not a url"), Arc::new(Registry::new()));
        assert!(matches!(result, Err(ClientError::InvalidUrl { .. })));
    }

    #[test]
    fn config_defaults() {
        let config = ClientConfig::new("http://localhost:8080");
        assert_eq!(config.rest_prefix, "rest");
        assert_eq!(config.timeout, REQUEST_TIMEOUT);
        assert!(config.user.is_none());
    }
}
