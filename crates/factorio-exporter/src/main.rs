//! factorio-exporter — Prometheus exporter for a running Factorio game.
//!
//! The game-side mod rewrites a JSON snapshot of its state on disk; every
//! scrape of `/metrics` re-reads that file and translates it into metrics.
//!
//! # Usage
//!
//! ```text
//! factorio-exporter --path /factorio/script-output/metrics.json --bind 0.0.0.0:9102
//! factorio-exporter -path=/factorio/script-output/metrics.json -bind=localhost:9102
//! ```
//!
//! Long flags also accept a single leading dash (`-path`, `-bind=...`), the
//! form used by existing deployments of the exporter.

mod config;

use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};

use crate::config::{ExporterConfig, Settings};

#[derive(Parser)]
#[command(
    name = "factorio-exporter",
    about = "Prometheus exporter for Factorio game state",
    version
)]
struct Cli {
    /// The path to the script-output/metrics.json file.
    #[arg(long)]
    path: Option<PathBuf>,

    /// The hostname and port to listen on.
    #[arg(long)]
    bind: Option<String>,

    /// Enable verbose logging.
    #[arg(long)]
    verbose: bool,

    /// Optional TOML config file. Flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Cli {
    fn settings(self) -> anyhow::Result<Settings> {
        let file = match &self.config {
            Some(path) => ExporterConfig::from_file(path)?,
            None => ExporterConfig::default(),
        };
        let flags = ExporterConfig {
            path: self.path,
            bind: self.bind,
            verbose: self.verbose.then_some(true),
        };
        file.merge(flags).resolve()
    }
}

/// Long flag names that may also be spelled with a single dash.
const LONG_FLAGS: &[&str] = &["path", "bind", "verbose", "config"];

/// Rewrite `-name` and `-name=value` to `--name...` for the known long flags.
/// Everything else, including values and anything after `--`, passes through.
fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut out = Vec::new();
    let mut passthrough = false;
    for arg in args {
        if !passthrough {
            if arg == "--" {
                passthrough = true;
            } else if let Some(rest) = arg.to_str().and_then(|a| a.strip_prefix('-')) {
                let name = rest.split_once('=').map_or(rest, |(name, _)| name);
                if LONG_FLAGS.contains(&name) {
                    out.push(OsString::from(format!("--{rest}")));
                    continue;
                }
            }
        }
        out.push(arg);
    }
    out
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "info,factorio_exporter=debug,factorio_api=debug,factorio_metrics=debug,factorio_snapshot=debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Cli::parse_from(normalize_args(std::env::args_os())).settings()?;
    init_tracing(settings.verbose);
    run(settings).await
}

async fn run(settings: Settings) -> anyhow::Result<()> {
    let coordinator = Arc::new(factorio_metrics::ScrapeCoordinator::for_path(&settings.path));
    info!(path = ?settings.path, "reading snapshots");

    let router = factorio_api::build_router(coordinator);

    info!(interface = %settings.bind, "starting Prometheus exporter");
    let listener = tokio::net::TcpListener::bind(settings.bind.as_str())
        .await
        .with_context(|| format!("failed to bind {}", settings.bind))?;

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("exporter stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        Err(e) => {
            error!(error = %e, "failed to install CTRL+C handler");
            std::future::pending::<()>().await;
        }
    }
}
