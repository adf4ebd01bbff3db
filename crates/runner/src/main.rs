use std::sync::Arc;

use anyhow::Context;
use rusty_farm_core::config::FarmConfig;
use rusty_farm_core::farm::{CatchRetryPolicy, FarmCtx, Supervisor};
use rusty_farm_core::player::DuplicatePolicy;
use rusty_farm_core::report::ConsoleReporter;

mod remote;

use remote::{Gateway, RemoteInventory, RemoteSessionClient};

fn init_tracing() {
    use tracing_subscriber::prelude::*;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    // stdout carries the farm report; diagnostics go to stderr.
    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
    let init_result = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init();
    if let Err(err) = init_result {
        tracing::warn!(error = %err, "tracing already initialized; skipping setup");
    }
}

const MAX_ITERATIONS_ENV: &str = "RUSTY_FARM_MAX_ITERATIONS";

fn max_iterations_from_env() -> anyhow::Result<Option<u64>> {
    parse_max_iterations(std::env::var(MAX_ITERATIONS_ENV).ok().as_deref())
}

/// Unset or blank means run forever; anything else must be a whole number.
fn parse_max_iterations(raw: Option<&str>) -> anyhow::Result<Option<u64>> {
    let Some(raw) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    let n = raw
        .parse::<u64>()
        .with_context(|| format!("{MAX_ITERATIONS_ENV}={raw:?} is not a whole number"))?;
    Ok(Some(n))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let max_iterations = max_iterations_from_env()?;
    let cfg = FarmConfig::load()?;
    let credentials = cfg.credentials()?.clone();
    tracing::info!(
        auth = %credentials.kind(),
        gateway = %cfg.gateway_addr,
        "runner.start"
    );

    let gateway = Arc::new(Gateway::connect(&cfg.gateway_addr).await?);
    let client =
        RemoteSessionClient::new(gateway.clone(), cfg.default_latitude, cfg.default_longitude);
    let inventory = RemoteInventory::new(
        gateway,
        DuplicatePolicy {
            keep_per_species: cfg.keep_per_species,
        },
    );
    let reporter = ConsoleReporter { color: cfg.color };

    let ctx = FarmCtx {
        client: &client,
        inventory: &inventory,
        reporter: &reporter,
        pacing: cfg.pacing,
        retry: cfg
            .max_catch_attempts
            .map(CatchRetryPolicy::bounded)
            .unwrap_or_default(),
    };

    let summary = Supervisor::new(ctx, &credentials)
        .run(max_iterations)
        .await?;
    tracing::info!(
        iterations = summary.iterations,
        failures = summary.failures,
        "runner.done"
    );
    Ok(())
}
