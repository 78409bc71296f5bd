//! medifuse — hybrid clinical-text and patient-data differential ranking.
//! Entry point for the command-line binary.
//!
//! Usage: `medifuse [request.json]` (reads stdin when no path is given).
//! The outcome JSON goes to stdout, logs go to stderr.

mod config;

use std::io::Read;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use medifuse_backend::{AnalysisRouter, LocalBackend, RemoteBackend, RoutingPolicy};
use medifuse_common::entities::{AnalysisFailure, AnalysisOutcome, AnalysisRequest};
use medifuse_ranker::Analyzer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn build_router(config: &config::Config) -> anyhow::Result<AnalysisRouter> {
    let analyzer = Analyzer::from_config(config.analysis.clone())
        .context("failed to initialise local analyzer")?;
    let local = Arc::new(LocalBackend::new(Arc::new(analyzer)));

    let policy = RoutingPolicy {
        fallback_to_local: config.routing.fallback_to_local,
        check_health:      config.routing.check_health,
    };
    let mut router = AnalysisRouter::new(local, policy);

    if config.remote.enabled {
        let remote = RemoteBackend::new(
            config.remote.base_url.clone(),
            Duration::from_secs(config.remote.timeout_secs),
        )?;
        info!(base_url = %config.remote.base_url, "Remote analysis backend enabled");
        router = router.with_remote(Arc::new(remote));
    }

    Ok(router)
}

fn read_request(path: Option<&str>) -> anyhow::Result<AnalysisRequest> {
    let raw = match path {
        Some(p) => std::fs::read_to_string(p).with_context(|| format!("cannot read request file {p}"))?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf).context("cannot read request from stdin")?;
            buf
        }
    };
    serde_json::from_str(&raw).context("request is not a valid analysis request")
}

async fn run(config: &config::Config, path: Option<&str>) -> anyhow::Result<AnalysisOutcome> {
    let request = read_request(path)?;
    let router = build_router(config)?;
    Ok(router.analyze(&request).await)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs on stderr; stdout carries only the outcome JSON.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("medifuse=debug,info")),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config = match config::Config::load() {
        Ok(c) => {
            info!(
                remote = c.remote.enabled,
                fallback_to_local = c.routing.fallback_to_local,
                "Configuration loaded"
            );
            c
        }
        Err(e) => {
            warn!("Could not load medifuse.toml: {e}");
            warn!("Continuing with built-in defaults.");
            config::Config::default()
        }
    };

    let path = std::env::args().nth(1);
    let outcome = run(&config, path.as_deref())
        .await
        .unwrap_or_else(|e| AnalysisFailure::new(format!("{e:#}")).into());

    println!("{}", serde_json::to_string_pretty(&outcome)?);

    if outcome.is_failure() {
        std::process::exit(1);
    }
    Ok(())
}
