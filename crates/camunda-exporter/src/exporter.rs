//! Wiring: config → client → pipeline → initial pass → cadences + server.

use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use tokio::sync::watch;
use tracing::{error, info};

use camunda_client::{ClientConfig, EngineClient};
use camunda_collect::{describe_metrics, CollectOptions, Pipeline, Scheduler};
use camunda_core::ExporterFile;
use camunda_sink::{Registry, Sink};

use crate::Cli;

/// Exit code when the mandatory initial collection fails.
const EXIT_INITIAL_PASS: u8 = 2;

pub async fn run(cli: Cli, server: String) -> anyhow::Result<ExitCode> {
    let file = match &cli.config {
        Some(path) => ExporterFile::from_file(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?,
        None => ExporterFile::default(),
    };

    // ── Sink ─────────────────────────────────────────────────────
    let registry = Registry::new();
    describe_metrics(&registry).context("failed to register metrics")?;
    let sink: Arc<dyn Sink> = Arc::new(registry.clone());

    // ── Engine client ────────────────────────────────────────────
    let client_config = ClientConfig::new(server)
        .with_prefix(cli.rest_prefix)
        .with_credentials(cli.user, cli.password);
    let client = EngineClient::new(client_config, Arc::clone(&sink))?;
    info!(
        server = %client.config().server,
        prefix = %client.config().rest_prefix,
        auth = client.config().user.is_some(),
        "engine client initialized"
    );

    // ── Pipeline ─────────────────────────────────────────────────
    let options = CollectOptions {
        fetch_runtime: cli.fetch_runtime,
        fetch_history: cli.fetch_history,
        fetch_metrics: cli.fetch_metrics,
        incident_statuses: file.incident_statuses(),
        activities: file.activities,
    };
    info!(
        runtime = options.fetch_runtime,
        history = options.fetch_history,
        metrics = options.fetch_metrics,
        named_activities = options.activities.len(),
        short_interval_ms = cli.short_interval.as_millis() as u64,
        long_interval_ms = cli.long_interval.as_millis() as u64,
        "collection configured"
    );
    let pipeline = Arc::new(Pipeline::new(client, sink, options));
    let scheduler = Scheduler::new(pipeline, cli.short_interval, cli.long_interval);

    // ── Initial pass: serve nothing rather than partial data ─────
    if let Err(e) = scheduler.initial_pass().await {
        error!(error = %e, "could not fetch all the stats, exiting");
        return Ok(ExitCode::from(EXIT_INITIAL_PASS));
    }

    // ── Cadences ─────────────────────────────────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let cadence_handles = scheduler.spawn(shutdown_rx);

    // ── Scrape endpoint ──────────────────────────────────────────
    let router = camunda_api::build_router(registry);
    let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "failed to install Ctrl-C handler");
                std::future::pending::<()>().await;
            }
            info!("shutdown signal received");
            let _ = shutdown_tx.send(true);
        })
        .await?;

    for handle in cadence_handles {
        let _ = handle.await;
    }

    info!("exporter stopped");
    Ok(ExitCode::SUCCESS)
}
