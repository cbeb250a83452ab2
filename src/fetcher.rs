//! Swap event source client.
//!
//! Queries a log-store HTTP endpoint for recent Uniswap V3 `Swap` logs joined
//! with their transaction sender and value: filtered by event topic, bounded
//! lookback window, row cap, newest first. Fetch failures surface as
//! `SourceUnavailable` so the pipeline can degrade to an empty feed.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use tracing::info;

use crate::config::{Config, SWAP_EVENT_TOPIC};
use crate::error::{AppError, Result};
use crate::types::SwapEvent;

const WEI_PER_ETH: f64 = 1e18;

#[async_trait]
pub trait SwapSource: Send + Sync {
    /// Fetch recent swap rows, newest first. An empty vec is a valid result.
    async fn fetch_recent(&self) -> Result<Vec<SwapEvent>>;
}

#[derive(Debug, Default)]
pub struct FetchStats {
    pub api_total: usize,
    pub rejected_no_sender: usize,
    pub rejected_no_payload: usize,
    pub rejected_bad_timestamp: usize,
    pub kept: usize,
}

// ---------------------------------------------------------------------------
// LogStore — HTTP log-store client
// ---------------------------------------------------------------------------

pub struct LogStore {
    client: reqwest::Client,
    base_url: String,
    project: String,
    bearer: String,
    lookback_days: u32,
    row_cap: usize,
}

impl LogStore {
    /// Build the client and load the bearer token from the credentials file.
    /// Missing or empty credentials fail here, before any fetch.
    pub fn new(cfg: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        let bearer = std::fs::read_to_string(&cfg.source_credentials)
            .map_err(|e| {
                AppError::Config(format!(
                    "cannot read source credentials at {}: {e}",
                    cfg.source_credentials
                ))
            })?
            .trim()
            .to_string();
        if bearer.is_empty() {
            return Err(AppError::Config(format!(
                "source credentials file {} is empty",
                cfg.source_credentials
            )));
        }
        Ok(Self {
            client,
            base_url: cfg.source_url.clone(),
            project: cfg.source_project.clone(),
            bearer,
            lookback_days: cfg.lookback_days,
            row_cap: cfg.fetch_row_cap,
        })
    }
}

#[async_trait]
impl SwapSource for LogStore {
    async fn fetch_recent(&self) -> Result<Vec<SwapEvent>> {
        let since = now_secs().saturating_sub(i64::from(self.lookback_days) * 86_400);
        let url = format!(
            "{}/v1/projects/{}/logs?topic0={}&since={}&limit={}&order=desc",
            self.base_url, self.project, SWAP_EVENT_TOPIC, since, self.row_cap
        );

        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.bearer)
            .send()
            .await
            .map_err(|e| AppError::SourceUnavailable(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(AppError::SourceUnavailable(format!(
                "source returned {}",
                resp.status()
            )));
        }
        let body: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| AppError::SourceUnavailable(e.to_string()))?;

        // Either a bare array or an object with a `rows` array.
        let rows = body
            .get("rows")
            .and_then(|r| r.as_array())
            .cloned()
            .or_else(|| body.as_array().cloned())
            .ok_or_else(|| {
                AppError::SourceUnavailable("log response was not a row array".to_string())
            })?;

        let mut stats = FetchStats {
            api_total: rows.len(),
            ..Default::default()
        };
        let mut events = Vec::with_capacity(rows.len().min(self.row_cap));
        for row in &rows {
            match parse_swap_row(row) {
                Ok(event) => {
                    events.push(event);
                    if events.len() >= self.row_cap {
                        break;
                    }
                }
                Err(Rejection::NoSender) => stats.rejected_no_sender += 1,
                Err(Rejection::NoPayload) => stats.rejected_no_payload += 1,
                Err(Rejection::BadTimestamp) => stats.rejected_bad_timestamp += 1,
            }
        }
        stats.kept = events.len();

        // The source promises newest-first; enforce it anyway.
        events.sort_by(|a, b| b.block_timestamp.cmp(&a.block_timestamp));

        info!(
            "[SOURCE] kept {}/{} rows (no_sender={} no_payload={} bad_timestamp={})",
            stats.kept,
            stats.api_total,
            stats.rejected_no_sender,
            stats.rejected_no_payload,
            stats.rejected_bad_timestamp,
        );
        Ok(events)
    }
}

// ---------------------------------------------------------------------------
// Row parsing
// ---------------------------------------------------------------------------

enum Rejection {
    NoSender,
    NoPayload,
    BadTimestamp,
}

/// Parse one source row. Rows missing the fields the pipeline cannot work
/// without are rejected and counted; payload *content* is not validated here —
/// that is the decoder's job.
fn parse_swap_row(v: &serde_json::Value) -> std::result::Result<SwapEvent, Rejection> {
    let sender = v.get("sender").and_then(|s| s.as_str()).unwrap_or("");
    if sender.is_empty() {
        return Err(Rejection::NoSender);
    }

    let data = v.get("data").and_then(|s| s.as_str()).unwrap_or("");
    if data.is_empty() {
        return Err(Rejection::NoPayload);
    }

    let pool_address = v
        .get("pool_address")
        .and_then(|s| s.as_str())
        .unwrap_or("")
        .to_string();

    // Wei value arrives as a numeric string (it overflows i64); tolerate
    // plain numbers too.
    let value_eth = v
        .get("value")
        .and_then(|x| x.as_f64().or_else(|| x.as_str().and_then(|s| s.parse().ok())))
        .unwrap_or(0.0)
        / WEI_PER_ETH;

    let block_timestamp = v
        .get("block_timestamp")
        .and_then(|t| {
            t.as_i64()
                .or_else(|| t.as_str().and_then(parse_iso_to_unix_secs))
        })
        .ok_or(Rejection::BadTimestamp)?;

    Ok(SwapEvent {
        sender: sender.to_string(),
        pool_address,
        data: data.to_string(),
        value_eth,
        block_timestamp,
    })
}

/// Parse an RFC 3339 / ISO 8601 UTC timestamp string to Unix seconds.
/// Fractional seconds and trailing offsets are ignored; date-only strings
/// resolve to midnight UTC.
pub fn parse_iso_to_unix_secs(s: &str) -> Option<i64> {
    let s = s.trim();
    let s = s.strip_suffix('Z').unwrap_or(s);
    let s = if let Some(dot) = s.find('.') { &s[..dot] } else { s };
    let s = if s.len() > 19 {
        let b = s.as_bytes()[19];
        if b == b'+' || b == b'-' {
            &s[..19]
        } else {
            s
        }
    } else {
        s
    };
    let (year, month, day, hour, minute, second): (i64, i64, i64, i64, i64, i64) =
        if s.len() == 10 {
            (
                s[0..4].parse().ok()?,
                s[5..7].parse().ok()?,
                s[8..10].parse().ok()?,
                0,
                0,
                0,
            )
        } else if s.len() >= 19 {
            (
                s[0..4].parse().ok()?,
                s[5..7].parse().ok()?,
                s[8..10].parse().ok()?,
                s[11..13].parse().ok()?,
                s[14..16].parse().ok()?,
                s[17..19].parse().ok()?,
            )
        } else {
            return None;
        };

    let a = (14 - month) / 12;
    let y = year + 4800 - a;
    let m = month + 12 * a - 3;
    let jdn = day + (153 * m + 2) / 5 + 365 * y + y / 4 - y / 100 + y / 400 - 32045;
    let unix_days = jdn - 2_440_588;
    Some(unix_days * 86_400 + hour * 3_600 + minute * 60 + second)
}

fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}
