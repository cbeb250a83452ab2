//! Budgeted narrative annotation.
//!
//! Takes the freshly classified swaps in display order, spends the narrative
//! budget on the head of the feed (one service attempt per item, no retries)
//! and fills the rest with a fixed placeholder. Per-item service failures
//! downgrade that item only; annotation of a feed never aborts.

use tracing::warn;

use crate::error::AppError;
use crate::narrator::{prompt, Narrator};
use crate::types::{AnnotatedSwap, ClassifiedSwap, RunStats, Sentiment};

/// Placeholder beyond the narrative budget; no service call is made.
pub const SKIPPED_NARRATIVE: &str = "analysis skipped to save api credits. [neutral]";

/// Fallback when the service reports quota/rate-limit exhaustion.
pub const RATE_LIMITED_NARRATIVE: &str = "analysis unavailable (api limit). [neutral]";

/// Fallback for any other service failure.
pub const FAILED_NARRATIVE: &str = "analysis failed. [neutral]";

/// Annotate up to `display_cap` swaps, calling the narrator for the first
/// `budget` of them, in order. Output preserves input order.
pub async fn annotate(
    swaps: Vec<ClassifiedSwap>,
    narrator: &dyn Narrator,
    display_cap: usize,
    budget: usize,
    stats: &mut RunStats,
) -> Vec<AnnotatedSwap> {
    let mut out = Vec::with_capacity(display_cap.min(swaps.len()));
    for (idx, swap) in swaps.into_iter().take(display_cap).enumerate() {
        let narrative = if idx < budget {
            match narrator
                .generate(&prompt::build_prompt(&swap.amounts, swap.is_bot))
                .await
            {
                Ok(text) => {
                    stats.narrated += 1;
                    text
                }
                Err(AppError::RateLimited(e)) => {
                    warn!("[ANNOTATE] rate-limited on item {idx}: {e}");
                    stats.fallback += 1;
                    RATE_LIMITED_NARRATIVE.to_string()
                }
                Err(e) => {
                    warn!("[ANNOTATE] generation failed on item {idx}: {e}");
                    stats.fallback += 1;
                    FAILED_NARRATIVE.to_string()
                }
            }
        } else {
            stats.skipped += 1;
            SKIPPED_NARRATIVE.to_string()
        };
        let sentiment = Sentiment::from_narrative(&narrative);
        out.push(AnnotatedSwap {
            swap,
            narrative,
            sentiment,
        });
    }
    out
}
