use alloy_primitives::I256;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Swap event
// ---------------------------------------------------------------------------

/// One raw swap row as returned by the event source. Immutable after fetch.
#[derive(Debug, Clone)]
pub struct SwapEvent {
    /// Wallet that initiated the transaction — the unit of bot classification.
    pub sender: String,
    pub pool_address: String,
    /// Hex-encoded log payload, with or without the `0x` marker.
    pub data: String,
    /// Transaction value converted from wei to ETH.
    pub value_eth: f64,
    /// Unix seconds.
    pub block_timestamp: i64,
}

/// The two token amounts encoded in a swap payload. Each is an independent
/// big-endian two's-complement 256-bit integer; sign encodes flow direction
/// relative to the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedAmounts {
    pub amount0: I256,
    pub amount1: I256,
}

// ---------------------------------------------------------------------------
// Pipeline stages — each stage produces a new record, no in-place mutation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ClassifiedSwap {
    pub event: SwapEvent,
    pub amounts: DecodedAmounts,
    /// Property of the sender, not the individual swap: one tight gap between
    /// any two consecutive swaps flags every swap from that sender.
    pub is_bot: bool,
}

#[derive(Debug, Clone)]
pub struct AnnotatedSwap {
    pub swap: ClassifiedSwap,
    pub narrative: String,
    pub sentiment: Sentiment,
}

// ---------------------------------------------------------------------------
// Sentiment
// ---------------------------------------------------------------------------

/// Tag embedded at the end of every narrative. The presentation layer styles
/// feed entries by this value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Bullish,
    Bearish,
    Neutral,
}

impl Sentiment {
    /// Classify a narrative by its embedded tag, case-insensitive.
    /// A narrative with no recognizable tag is neutral.
    pub fn from_narrative(narrative: &str) -> Self {
        let lower = narrative.to_lowercase();
        if lower.contains("[bullish]") {
            Sentiment::Bullish
        } else if lower.contains("[bearish]") {
            Sentiment::Bearish
        } else {
            Sentiment::Neutral
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Sentiment::Bullish => "bullish",
            Sentiment::Bearish => "bearish",
            Sentiment::Neutral => "neutral",
        };
        write!(f, "{s}")
    }
}

// ---------------------------------------------------------------------------
// Run output
// ---------------------------------------------------------------------------

/// Counters accumulated over one pipeline run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunStats {
    /// Rows returned by the source before display truncation.
    pub fetched: usize,
    pub unique_senders: usize,
    pub bot_senders: usize,
    /// Narratives obtained from the service.
    pub narrated: usize,
    /// Per-item service failures downgraded to fallback text.
    pub fallback: usize,
    /// Items beyond the narrative budget that got the skip placeholder.
    pub skipped: usize,
}

/// Final output of one run: the annotated feed, newest first, capped to the
/// display size. All state is run-scoped; nothing persists across runs.
#[derive(Debug, Clone, Default)]
pub struct RunResult {
    pub swaps: Vec<AnnotatedSwap>,
    pub stats: RunStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentiment_matches_bullish_tag() {
        assert_eq!(
            Sentiment::from_narrative("big buy incoming. [bullish]"),
            Sentiment::Bullish
        );
    }

    #[test]
    fn sentiment_matches_bearish_case_insensitive() {
        assert_eq!(
            Sentiment::from_narrative("heavy selling. [BEARISH]"),
            Sentiment::Bearish
        );
    }

    #[test]
    fn sentiment_defaults_to_neutral() {
        assert_eq!(
            Sentiment::from_narrative("analysis failed."),
            Sentiment::Neutral
        );
        assert_eq!(
            Sentiment::from_narrative("mixed flows today. [neutral]"),
            Sentiment::Neutral
        );
    }
}
