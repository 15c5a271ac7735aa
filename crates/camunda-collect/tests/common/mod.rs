//! In-process mock engine for collector tests.
//!
//! Responses are keyed by the raw request path and query exactly as the
//! client sends them (percent-encoded). Unknown paths answer 404.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{StatusCode, Uri};
use axum::response::IntoResponse;
use axum::Router;
use serde_json::Value;

use camunda_client::{ClientConfig, EngineClient};
use camunda_collect::{describe_metrics, CollectOptions, Pipeline};
use camunda_sink::Registry;

#[derive(Clone, Default)]
pub struct MockEngine {
    routes: Arc<Mutex<HashMap<String, (StatusCode, String)>>>,
    hits: Arc<Mutex<Vec<String>>>,
}

impl MockEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ok(&self, path_and_query: &str, body: Value) {
        self.routes
            .lock()
            .unwrap()
            .insert(path_and_query.to_string(), (StatusCode::OK, body.to_string()));
    }

    pub fn fail(&self, path_and_query: &str, status: StatusCode) {
        self.routes
            .lock()
            .unwrap()
            .insert(path_and_query.to_string(), (status, "{}".to_string()));
    }

    pub fn hits(&self) -> Vec<String> {
        self.hits.lock().unwrap().clone()
    }

    pub fn hit_count(&self, path_and_query: &str) -> usize {
        self.hits().iter().filter(|h| *h == path_and_query).count()
    }

    /// Serve on an ephemeral port and return the base URL.
    pub async fn start(&self) -> String {
        let router = Router::new().fallback(respond).with_state(self.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }
}

async fn respond(State(engine): State<MockEngine>, uri: Uri) -> impl IntoResponse {
    let key = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_default();
    engine.hits.lock().unwrap().push(key.clone());

    let route = engine.routes.lock().unwrap().get(&key).cloned();
    match route {
        Some((status, body)) => (status, [("content-type", "application/json")], body),
        None => (
            StatusCode::NOT_FOUND,
            [("content-type", "application/json")],
            format!("{{\"message\":\"no mock for {key}\"}}"),
        ),
    }
}

pub fn client(base: &str, registry: &Registry) -> EngineClient {
    EngineClient::new(ClientConfig::new(base), Arc::new(registry.clone())).unwrap()
}

pub fn pipeline(base: &str, options: CollectOptions) -> (Registry, Pipeline) {
    let registry = Registry::new();
    describe_metrics(&registry).unwrap();
    let sink = Arc::new(registry.clone());
    let pipeline = Pipeline::new(client(base, &registry), sink, options);
    (registry, pipeline)
}

pub fn definition_stat(id: &str, key: &str, version: i64, suspended: bool, instances: i64, failed_jobs: i64) -> Value {
    serde_json::json!({
        "@class": "org.camunda.bpm.engine.rest.dto.repository.ProcessDefinitionStatisticsResultDto",
        "id": id,
        "instances": instances,
        "failedJobs": failed_jobs,
        "incidents": [],
        "definition": {
            "id": id,
            "key": key,
            "category": "http://bpmn.io/schema/bpmn",
            "description": null,
            "name": key,
            "version": version,
            "resource": format!("{key}.bpmn"),
            "deploymentId": format!("dep-{key}"),
            "diagram": null,
            "suspended": suspended,
            "tenantId": null,
            "versionTag": null
        }
    })
}
