use std::collections::HashMap;

use crate::types::SwapEvent;

/// Flag senders whose consecutive swaps ever land within `gap_secs` of each
/// other. Returns sender → is_bot for every sender present in `events`.
///
/// Events are grouped per sender and sorted by timestamp ascending before the
/// gaps are measured, so input order is irrelevant. A sender with a single
/// swap is never flagged. Input is not mutated.
pub fn classify_senders(events: &[SwapEvent], gap_secs: i64) -> HashMap<String, bool> {
    let mut by_sender: HashMap<&str, Vec<i64>> = HashMap::new();
    for event in events {
        by_sender
            .entry(&event.sender)
            .or_default()
            .push(event.block_timestamp);
    }

    let mut flags = HashMap::with_capacity(by_sender.len());
    for (sender, mut stamps) in by_sender {
        stamps.sort_unstable();
        let is_bot = stamps.windows(2).any(|pair| pair[1] - pair[0] <= gap_secs);
        flags.insert(sender.to_string(), is_bot);
    }
    flags
}

#[cfg(test)]
mod tests {
    use super::*;

    const GAP: i64 = 300;

    fn swap(sender: &str, ts: i64) -> SwapEvent {
        SwapEvent {
            sender: sender.to_string(),
            pool_address: "0xpool".to_string(),
            data: String::new(),
            value_eth: 0.0,
            block_timestamp: ts,
        }
    }

    #[test]
    fn four_minute_gap_flags_sender() {
        // 10:00:00 and 10:04:00
        let events = vec![swap("0xA", 36_000), swap("0xA", 36_240)];
        let flags = classify_senders(&events, GAP);
        assert_eq!(flags["0xA"], true);
    }

    #[test]
    fn ten_minute_gap_does_not_flag() {
        // 10:00:00 and 10:10:00
        let events = vec![swap("0xA", 36_000), swap("0xA", 36_600)];
        let flags = classify_senders(&events, GAP);
        assert_eq!(flags["0xA"], false);
    }

    #[test]
    fn one_tight_gap_among_wide_ones_flags() {
        // T, T+4min, T+10min — the first pair is enough.
        let events = vec![swap("0xA", 0), swap("0xA", 240), swap("0xA", 600)];
        assert_eq!(classify_senders(&events, GAP)["0xA"], true);
    }

    #[test]
    fn single_swap_never_flags() {
        let events = vec![swap("0xA", 36_000)];
        assert_eq!(classify_senders(&events, GAP)["0xA"], false);
    }

    #[test]
    fn gap_equal_to_threshold_flags() {
        let events = vec![swap("0xA", 0), swap("0xA", GAP)];
        assert_eq!(classify_senders(&events, GAP)["0xA"], true);
    }

    #[test]
    fn senders_are_independent_and_input_order_is_irrelevant() {
        let events = vec![
            swap("0xB", 1_000),
            swap("0xA", 500),
            swap("0xB", 10_000),
            swap("0xA", 400),
        ];
        let flags = classify_senders(&events, GAP);
        assert_eq!(flags["0xA"], true);
        assert_eq!(flags["0xB"], false);
        assert_eq!(flags.len(), 2);
    }

    #[test]
    fn identical_timestamps_count_as_zero_gap() {
        let events = vec![swap("0xA", 100), swap("0xA", 100)];
        assert_eq!(classify_senders(&events, GAP)["0xA"], true);
    }
}
