//! One feed run: fetch → decode → classify → annotate.

use tracing::{info, warn};

use crate::annotator;
use crate::config::Config;
use crate::decoder::decode_swap_log;
use crate::detector::classify_senders;
use crate::error::Result;
use crate::fetcher::SwapSource;
use crate::narrator::Narrator;
use crate::types::{ClassifiedSwap, RunResult, RunStats};

pub struct Pipeline<S, N> {
    cfg: Config,
    source: S,
    narrator: N,
}

impl<S: SwapSource, N: Narrator> Pipeline<S, N> {
    pub fn new(cfg: Config, source: S, narrator: N) -> Self {
        Self {
            cfg,
            source,
            narrator,
        }
    }

    /// Execute one run. An unavailable source yields an empty result instead
    /// of an error; a malformed payload fails the run with no partial output.
    pub async fn run(&self) -> Result<RunResult> {
        let events = match self.source.fetch_recent().await {
            Ok(events) => events,
            Err(e) => {
                warn!("[PIPELINE] source unavailable, serving empty feed: {e}");
                return Ok(RunResult::default());
            }
        };
        if events.is_empty() {
            info!("[PIPELINE] source returned no swaps");
            return Ok(RunResult::default());
        }

        let mut stats = RunStats {
            fetched: events.len(),
            ..Default::default()
        };

        // Decode every payload up front; one bad row voids the run.
        let mut decoded = Vec::with_capacity(events.len());
        for event in &events {
            decoded.push(decode_swap_log(&event.data)?);
        }

        let flags = classify_senders(&events, self.cfg.bot_gap_secs);
        stats.unique_senders = flags.len();
        stats.bot_senders = flags.values().filter(|&&is_bot| is_bot).count();

        let mut classified: Vec<ClassifiedSwap> = events
            .into_iter()
            .zip(decoded)
            .map(|(event, amounts)| {
                let is_bot = flags.get(&event.sender).copied().unwrap_or(false);
                ClassifiedSwap {
                    event,
                    amounts,
                    is_bot,
                }
            })
            .collect();

        // Feed order is newest first regardless of source ordering.
        classified.sort_by(|a, b| b.event.block_timestamp.cmp(&a.event.block_timestamp));

        let swaps = annotator::annotate(
            classified,
            &self.narrator,
            self.cfg.feed_display_cap,
            self.cfg.narrative_budget,
            &mut stats,
        )
        .await;

        info!(
            fetched = stats.fetched,
            senders = stats.unique_senders,
            bots = stats.bot_senders,
            narrated = stats.narrated,
            fallback = stats.fallback,
            skipped = stats.skipped,
            "[PIPELINE] run complete: {} swaps in feed",
            swaps.len(),
        );

        Ok(RunResult { swaps, stats })
    }
}
