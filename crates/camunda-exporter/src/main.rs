//! camunda-exporter: Prometheus exporter for the Camunda REST API.
//!
//! Polls incident counts, process-definition and activity statistics on
//! a short cadence and engine metrics on a long one, then serves the
//! latest values on `/metrics`.
//!
//! # Usage
//!
//! ```text
//! camunda-exporter --server http://camunda:8080 --restPrefix engine-rest \
//!     --fetch-runtime --fetch-history --fetch-metrics --port 9101
//! ```
//!
//! # Exit codes
//!
//! - `1`: no `--server`, an invalid flag, or a wiring error (bad config
//!   file, bind failure)
//! - `2`: the initial collection pass failed
//! - `0`: clean shutdown on Ctrl-C, or `--help`/`--version`

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, ValueEnum};
use tracing::error;

use camunda_core::parse_duration;

mod exporter;

#[derive(Debug, Parser)]
#[command(
    name = "camunda-exporter",
    about = "Exports Camunda REST API statistics as Prometheus metrics",
    version
)]
struct Cli {
    /// The Camunda server URI, e.g. http://camunda:8080.
    #[arg(long)]
    server: Option<String>,

    /// REST path prefix below the server.
    #[arg(long = "restPrefix", default_value = "rest")]
    rest_prefix: String,

    /// The http port the exporter listens on.
    #[arg(long, default_value_t = 8080)]
    port: u16,

    /// Interval between two incident/statistics collections.
    #[arg(long = "shortInterval", default_value = "30s", value_parser = parse_duration)]
    short_interval: Duration,

    /// Interval between two engine metrics collections.
    #[arg(long = "longInterval", default_value = "15m", value_parser = parse_duration)]
    long_interval: Duration,

    /// Log every collected value.
    #[arg(long)]
    verbose: bool,

    /// Collect process-definition and runtime activity statistics.
    #[arg(long)]
    fetch_runtime: bool,

    /// Collect history incidents and historic activity statistics.
    #[arg(long)]
    fetch_history: bool,

    /// Collect engine metrics.
    #[arg(long)]
    fetch_metrics: bool,

    /// Basic-auth user.
    #[arg(long)]
    user: Option<String>,

    /// Basic-auth password.
    #[arg(long)]
    password: Option<String>,

    /// TOML file listing named activities and incident statuses.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log output format.
    #[arg(long, value_enum, default_value = "text")]
    log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(parse_error_code(&e));
        }
    };
    init_tracing(cli.verbose, cli.log_format);

    let Some(server) = cli.server.clone().filter(|s| !s.trim().is_empty()) else {
        eprintln!("You must specify the Camunda server URI!\n");
        eprintln!("{}", Cli::command().render_help());
        return ExitCode::from(1);
    };

    match exporter::run(cli, server).await {
        Ok(code) => code,
        Err(e) => {
            error!(error = %format!("{e:#}"), "exporter failed");
            ExitCode::from(1)
        }
    }
}

/// Exit code for a rejected command line: 0 for help/version, 1 otherwise.
fn parse_error_code(err: &clap::Error) -> u8 {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => 1,
    }
}

fn init_tracing(verbose: bool, format: LogFormat) {
    let default_filter = if verbose {
        "info,camunda_exporter=debug,camunda_collect=debug,camunda_client=debug,camunda_sink=debug,camunda_api=debug"
    } else {
        "info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    match format {
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
    }
}
