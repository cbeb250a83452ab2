//! Shared health state for the /health endpoint.
//! Updated by the feed refresher, read by the API.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Default)]
pub struct HealthState {
    /// Unix-seconds timestamp of the last successful run (0 = none yet).
    last_run_at: AtomicU64,
    runs_completed: AtomicU64,
    /// Swap count in the currently served feed.
    feed_size: AtomicU64,
    /// False while the most recent run attempt failed.
    last_run_ok: AtomicBool,
}

impl HealthState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_run_success(&self, feed_size: u64) {
        self.last_run_at.store(now_secs(), Ordering::Relaxed);
        self.runs_completed.fetch_add(1, Ordering::Relaxed);
        self.feed_size.store(feed_size, Ordering::Relaxed);
        self.last_run_ok.store(true, Ordering::Relaxed);
    }

    pub fn mark_run_failure(&self) {
        self.last_run_ok.store(false, Ordering::Relaxed);
    }

    pub fn last_run_at(&self) -> u64 {
        self.last_run_at.load(Ordering::Relaxed)
    }

    pub fn runs_completed(&self) -> u64 {
        self.runs_completed.load(Ordering::Relaxed)
    }

    pub fn feed_size(&self) -> u64 {
        self.feed_size.load(Ordering::Relaxed)
    }

    pub fn last_run_ok(&self) -> bool {
        self.last_run_ok.load(Ordering::Relaxed)
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
