mod annotator;
mod api;
mod config;
mod decoder;
mod detector;
mod error;
mod feed_refresh;
mod fetcher;
mod narrator;
mod pipeline;
mod types;

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::api::health::HealthState;
use crate::api::latency::LatencyStats;
use crate::api::routes::{router, ApiState};
use crate::config::Config;
use crate::error::Result;
use crate::feed_refresh::{FeedRefresher, SharedFeed};
use crate::fetcher::LogStore;
use crate::narrator::GeminiNarrator;
use crate::pipeline::Pipeline;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .init();

    if let Err(e) = run(cfg).await {
        error!("Fatal error: {e}");
        std::process::exit(1);
    }
}

async fn run(cfg: Config) -> Result<()> {
    let latency = Arc::new(LatencyStats::new());
    let health = Arc::new(HealthState::new());
    let feed: SharedFeed = Arc::new(RwLock::new(None));

    // Both clients validate their credentials here, before any fetch.
    let source = LogStore::new(&cfg)?;
    let narrator = GeminiNarrator::new(&cfg, Arc::clone(&latency))?;
    let pipeline = Pipeline::new(cfg.clone(), source, narrator);

    info!(
        "Feed pipeline ready (lookback={}d, row_cap={}, display_cap={}, narrative_budget={}, refresh={}s)",
        cfg.lookback_days,
        cfg.fetch_row_cap,
        cfg.feed_display_cap,
        cfg.narrative_budget,
        cfg.refresh_interval_secs,
    );

    let refresher = FeedRefresher::new(
        pipeline,
        Arc::clone(&feed),
        Arc::clone(&health),
        cfg.refresh_interval_secs,
    );
    tokio::spawn(async move { refresher.run().await });

    let api_state = ApiState {
        feed,
        latency,
        health,
    };
    let app = router(api_state);
    let bind_addr = format!("0.0.0.0:{}", cfg.api_port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("HTTP API listening on {bind_addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
