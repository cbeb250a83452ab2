use std::collections::HashSet;
use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::api::health::HealthState;
use crate::api::latency::LatencyStats;
use crate::feed_refresh::SharedFeed;
use crate::types::{AnnotatedSwap, Sentiment};

#[derive(Clone)]
pub struct ApiState {
    pub feed: SharedFeed,
    pub latency: Arc<LatencyStats>,
    pub health: Arc<HealthState>,
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/feed", get(get_feed))
        .route("/stats/summary", get(get_stats_summary))
        .route("/stats/latency", get(get_stats_latency))
        .route("/health", get(get_health))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct FeedItemResponse {
    pub sender: String,
    pub pool_address: String,
    pub is_bot: bool,
    pub block_timestamp: i64,
    /// Decimal strings — the amounts exceed every native integer width.
    pub amount0: String,
    pub amount1: String,
    pub value_eth: f64,
    pub narrative: String,
    pub sentiment: Sentiment,
}

impl From<&AnnotatedSwap> for FeedItemResponse {
    fn from(item: &AnnotatedSwap) -> Self {
        Self {
            sender: item.swap.event.sender.clone(),
            pool_address: item.swap.event.pool_address.clone(),
            is_bot: item.swap.is_bot,
            block_timestamp: item.swap.event.block_timestamp,
            amount0: item.swap.amounts.amount0.to_string(),
            amount1: item.swap.amounts.amount1.to_string(),
            value_eth: item.swap.event.value_eth,
            narrative: item.narrative.clone(),
            sentiment: item.sentiment,
        }
    }
}

#[derive(Serialize)]
pub struct SummaryResponse {
    /// Distinct wallets in the served feed.
    pub active_wallets: usize,
    /// Swaps in the served feed.
    pub transactions_analyzed: usize,
    /// Distinct flagged wallets in the served feed.
    pub active_bots: usize,
    pub fetched: usize,
    pub narrated: usize,
    pub fallback: usize,
    pub skipped: usize,
    pub last_run_at: u64,
    pub runs_completed: u64,
}

#[derive(Serialize)]
pub struct LatencyResponse {
    pub p50_ms: Option<u64>,
    pub p95_ms: Option<u64>,
    pub p99_ms: Option<u64>,
    pub samples: u64,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub last_run_at: u64,
    pub runs_completed: u64,
    pub feed_size: u64,
    pub last_run_ok: bool,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn get_feed(State(state): State<ApiState>) -> Json<Vec<FeedItemResponse>> {
    let guard = state.feed.read().await;
    let items = guard
        .as_ref()
        .map(|run| run.swaps.iter().map(FeedItemResponse::from).collect())
        .unwrap_or_default();
    Json(items)
}

async fn get_stats_summary(State(state): State<ApiState>) -> Json<SummaryResponse> {
    let guard = state.feed.read().await;

    let (active_wallets, transactions_analyzed, active_bots, stats) = match guard.as_ref() {
        Some(run) => {
            let wallets: HashSet<&str> = run
                .swaps
                .iter()
                .map(|s| s.swap.event.sender.as_str())
                .collect();
            let bots: HashSet<&str> = run
                .swaps
                .iter()
                .filter(|s| s.swap.is_bot)
                .map(|s| s.swap.event.sender.as_str())
                .collect();
            (wallets.len(), run.swaps.len(), bots.len(), run.stats.clone())
        }
        None => (0, 0, 0, Default::default()),
    };

    Json(SummaryResponse {
        active_wallets,
        transactions_analyzed,
        active_bots,
        fetched: stats.fetched,
        narrated: stats.narrated,
        fallback: stats.fallback,
        skipped: stats.skipped,
        last_run_at: state.health.last_run_at(),
        runs_completed: state.health.runs_completed(),
    })
}

async fn get_stats_latency(State(state): State<ApiState>) -> Json<LatencyResponse> {
    let (p50_ms, p95_ms, p99_ms) = state.latency.percentiles();
    Json(LatencyResponse {
        p50_ms,
        p95_ms,
        p99_ms,
        samples: state.latency.len(),
    })
}

async fn get_health(State(state): State<ApiState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        last_run_at: state.health.last_run_at(),
        runs_completed: state.health.runs_completed(),
        feed_size: state.health.feed_size(),
        last_run_ok: state.health.last_run_ok(),
    })
}
