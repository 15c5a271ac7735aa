//! Transport tests against an in-process mock engine.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, Query};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use camunda_client::{ClientConfig, ClientError, EngineClient, HTTP_REQUESTS_TOTAL};
use camunda_core::MetricCount;
use camunda_sink::{labels, Registry};

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn client(base: &str, registry: &Registry) -> EngineClient {
    EngineClient::new(ClientConfig::new(base), Arc::new(registry.clone())).unwrap()
}

#[tokio::test]
async fn fetches_json_below_prefix() {
    let router = Router::new().route(
        "/rest/history/incident/count",
        get(|Query(q): Query<HashMap<String, String>>| async move {
            assert_eq!(q.get("open").map(String::as_str), Some("true"));
            Json(json!({ "count": 7 }))
        }),
    );
    let base = serve(router).await;
    let registry = Registry::new();

    let count: MetricCount = client(&base, &registry)
        .fetch_json("history/incident/count?open=true")
        .await
        .unwrap();

    assert_eq!(count.count, 7);
    assert_eq!(
        registry.value(HTTP_REQUESTS_TOTAL, &labels([("code", "200")])),
        Some(1.0)
    );
}

#[tokio::test]
async fn sends_accept_header_and_basic_auth() {
    let router = Router::new().route(
        "/rest/history/incident/count",
        get(|headers: HeaderMap| async move {
            let accept = headers.get("accept").and_then(|v| v.to_str().ok());
            let auth = headers.get("authorization").and_then(|v| v.to_str().ok());
            if accept != Some("application/json") {
                return StatusCode::NOT_ACCEPTABLE.into_response();
            }
            // exporter:s3cret
            if auth != Some("Basic ZXhwb3J0ZXI6czNjcmV0") {
                return StatusCode::UNAUTHORIZED.into_response();
            }
            Json(json!({ "count": 1 })).into_response()
        }),
    );
    let base = serve(router).await;
    let registry = Registry::new();

    let anonymous = client(&base, &registry);
    let err = anonymous
        .history_incident_count("open")
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Status { status: 401, .. }));

    let config = ClientConfig::new(&base)
        .with_credentials(Some("exporter".to_string()), Some("s3cret".to_string()));
    let authed = EngineClient::new(config, Arc::new(registry.clone())).unwrap();
    assert_eq!(authed.history_incident_count("open").await.unwrap(), 1);

    assert_eq!(
        registry.value(HTTP_REQUESTS_TOTAL, &labels([("code", "401")])),
        Some(1.0)
    );
}

#[tokio::test]
async fn non_200_is_a_status_error() {
    let router = Router::new().route(
        "/rest/metrics",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let base = serve(router).await;
    let registry = Registry::new();

    let err = client(&base, &registry).metrics(1, None).await.unwrap_err();

    match err {
        ClientError::Status { url, status } => {
            assert_eq!(status, 500);
            assert!(url.ends_with("/rest/metrics?maxResults=1"), "url was {url}");
        }
        other => panic!("expected status error, got {other:?}"),
    }
    assert_eq!(
        registry.value(HTTP_REQUESTS_TOTAL, &labels([("code", "500")])),
        Some(1.0)
    );
}

#[tokio::test]
async fn other_2xx_is_still_a_failure() {
    let router = Router::new().route(
        "/rest/metrics",
        get(|| async { (StatusCode::NO_CONTENT, "") }),
    );
    let base = serve(router).await;
    let registry = Registry::new();

    let err = client(&base, &registry).metrics(1, None).await.unwrap_err();
    assert!(matches!(err, ClientError::Status { status: 204, .. }));
}

#[tokio::test]
async fn malformed_json_is_a_decode_error() {
    let router = Router::new().route(
        "/rest/process-definition/statistics",
        get(|| async { "[{\"id\": " }),
    );
    let base = serve(router).await;
    let registry = Registry::new();

    let err = client(&base, &registry)
        .process_definition_statistics()
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Decode { .. }));
}

#[tokio::test]
async fn connection_refused_is_a_request_error() {
    // Bind and drop to get a port nothing listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let registry = Registry::new();
    let err = client(&format!("http://{addr}"), &registry)
        .history_incident_count("open")
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Request { .. }));
    // No response, nothing counted.
    assert!(registry.gather().is_empty());
}

#[tokio::test]
async fn slow_engine_hits_the_timeout() {
    let router = Router::new().route(
        "/rest/history/incident/count",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(2)).await;
            Json(json!({ "count": 1 }))
        }),
    );
    let base = serve(router).await;
    let registry = Registry::new();
    let config = ClientConfig::new(&base).with_timeout(Duration::from_millis(200));
    let c = EngineClient::new(config, Arc::new(registry)).unwrap();

    let err = c.history_incident_count("open").await.unwrap_err();
    assert!(matches!(err, ClientError::Request { .. }));
}

#[tokio::test]
async fn absolute_urls_bypass_the_prefix() {
    let router = Router::new().route(
        "/engine-rest/history/incident/count",
        get(|| async { Json(json!({ "count": 3 })) }),
    );
    let base = serve(router).await;
    let registry = Registry::new();

    // Server and prefix point elsewhere; the absolute path wins.
    let config = ClientConfig::new("http://127.0.0.1:1").with_prefix("rest");
    let c = EngineClient::new(config, Arc::new(registry)).unwrap();
    let count: MetricCount = c
        .fetch_json(&format!("{base}/engine-rest/history/incident/count?resolved=true"))
        .await
        .unwrap();
    assert_eq!(count.count, 3);
}

#[tokio::test]
async fn endpoint_helpers_encode_their_arguments() {
    let router = Router::new()
        .route(
            "/rest/metrics",
            get(|Query(q): Query<HashMap<String, String>>| async move {
                assert_eq!(q.get("maxResults").map(String::as_str), Some("100"));
                assert_eq!(
                    q.get("startDate").map(String::as_str),
                    Some("2024-03-01T10:15:00.000+0100")
                );
                Json(json!([
                    { "timestamp": "2024-03-01T10:15:00.000+0100", "name": "job-successful", "value": 5 }
                ]))
            }),
        )
        .route(
            "/rest/process-definition/{id}/statistics",
            get(|Path(id): Path<String>| async move {
                assert_eq!(id, "invoice:2:abc");
                Json(json!([{ "id": "ServiceTask_1", "instances": 2, "failedJobs": 1 }]))
            }),
        )
        .route(
            "/rest/history/activity-instance/count",
            get(|Query(q): Query<HashMap<String, String>>| async move {
                let count = if q.get("activityId").map(String::as_str) == Some("EndEvent_1") { 9 } else { 0 };
                Json(json!({ "count": count }))
            }),
        );
    let base = serve(router).await;
    let registry = Registry::new();
    let c = client(&base, &registry);

    let metrics = c
        .metrics(100, Some("2024-03-01T10:15:00.000+0100"))
        .await
        .unwrap();
    assert_eq!(metrics.len(), 1);
    assert_eq!(metrics[0].name, "job-successful");

    let stats = c.activity_statistics("invoice:2:abc").await.unwrap();
    assert_eq!(stats[0].activity_id, "ServiceTask_1");
    assert_eq!(stats[0].failed_jobs, 1);

    assert_eq!(c.activity_instance_count("EndEvent_1").await.unwrap(), 9);
}
