//! Periodic feed refresh task.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::{error, info};

use crate::api::health::HealthState;
use crate::fetcher::SwapSource;
use crate::narrator::Narrator;
use crate::pipeline::Pipeline;
use crate::types::RunResult;

/// Shared slot holding the latest completed run for the API.
pub type SharedFeed = Arc<RwLock<Option<RunResult>>>;

/// Runs the pipeline at startup and then on every interval tick, publishing
/// each completed run for the API. A failed run keeps the previous feed in
/// place and never kills the task.
pub struct FeedRefresher<S, N> {
    pipeline: Pipeline<S, N>,
    feed: SharedFeed,
    health: Arc<HealthState>,
    interval_secs: u64,
}

impl<S: SwapSource, N: Narrator> FeedRefresher<S, N> {
    pub fn new(
        pipeline: Pipeline<S, N>,
        feed: SharedFeed,
        health: Arc<HealthState>,
        interval_secs: u64,
    ) -> Self {
        Self {
            pipeline,
            feed,
            health,
            interval_secs,
        }
    }

    pub async fn run(self) {
        loop {
            match self.pipeline.run().await {
                Ok(result) => {
                    self.health.mark_run_success(result.swaps.len() as u64);
                    info!("[REFRESH] feed updated: {} swaps", result.swaps.len());
                    *self.feed.write().await = Some(result);
                }
                Err(e) => {
                    self.health.mark_run_failure();
                    error!("[REFRESH] run failed, keeping previous feed: {e}");
                }
            }
            tokio::time::sleep(Duration::from_secs(self.interval_secs)).await;
        }
    }
}
