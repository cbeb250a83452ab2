//! Deterministic prompt construction from decoded swap amounts.

use crate::types::DecodedAmounts;

/// Human-readable buy/sell action derived from the signed amounts. Negative
/// `amount0` means the pool paid out token0 — the user bought token0 and sold
/// token1; otherwise the other way round.
pub fn describe_action(amounts: &DecodedAmounts) -> String {
    let magnitude0 = group_digits(&amounts.amount0.unsigned_abs().to_string());
    let magnitude1 = group_digits(&amounts.amount1.unsigned_abs().to_string());
    if amounts.amount0.is_negative() {
        format!("user bought {magnitude0} of token0 and sold {magnitude1} of token1")
    } else {
        format!("user sold {magnitude0} of token0 and bought {magnitude1} of token1")
    }
}

/// Build the full analyst prompt for one swap. Same inputs, same prompt.
pub fn build_prompt(amounts: &DecodedAmounts, is_bot: bool) -> String {
    let action = describe_action(amounts);
    let bot_note = if is_bot {
        "this wallet is flagged as a bot due to high-frequency trading.\n"
    } else {
        ""
    };
    format!(
        "you are a financial analyst. summarize this trade in 1 sentence.\n\
         focus on the decoded action: \"{action}\".\n\
         instruction: large numbers (billions+) usually imply meme coins. \
         small numbers (0-100) often imply major assets like eth/wbtc.\n\
         {bot_note}\
         end with exactly one tag: [bullish], [bearish], or [neutral]."
    )
}

/// Group a digit string in threes: `1234567` → `1,234,567`.
fn group_digits(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    let offset = digits.len() % 3;
    for (i, c) in digits.chars().enumerate() {
        if i != 0 && (i + 3 - offset) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::I256;

    fn amounts(a0: i128, a1: i128) -> DecodedAmounts {
        DecodedAmounts {
            amount0: I256::try_from(a0).unwrap(),
            amount1: I256::try_from(a1).unwrap(),
        }
    }

    #[test]
    fn negative_amount0_reads_as_buying_token0() {
        let action = describe_action(&amounts(-1_500_000, 3_000));
        assert_eq!(
            action,
            "user bought 1,500,000 of token0 and sold 3,000 of token1"
        );
    }

    #[test]
    fn positive_amount0_reads_as_selling_token0() {
        let action = describe_action(&amounts(250, -42));
        assert_eq!(action, "user sold 250 of token0 and bought 42 of token1");
    }

    #[test]
    fn prompt_includes_bot_note_only_when_flagged() {
        let flagged = build_prompt(&amounts(-1, 1), true);
        assert!(flagged.contains("flagged as a bot"));

        let unflagged = build_prompt(&amounts(-1, 1), false);
        assert!(!unflagged.contains("flagged as a bot"));
    }

    #[test]
    fn prompt_demands_exactly_one_closing_tag() {
        let prompt = build_prompt(&amounts(10, -10), false);
        assert!(prompt.ends_with("end with exactly one tag: [bullish], [bearish], or [neutral]."));
    }

    #[test]
    fn prompt_is_deterministic() {
        assert_eq!(
            build_prompt(&amounts(-7, 7), true),
            build_prompt(&amounts(-7, 7), true)
        );
    }

    #[test]
    fn groups_digits_in_threes() {
        assert_eq!(group_digits("0"), "0");
        assert_eq!(group_digits("999"), "999");
        assert_eq!(group_digits("1000"), "1,000");
        assert_eq!(group_digits("1234567"), "1,234,567");
        assert_eq!(group_digits("123456789012"), "123,456,789,012");
    }
}
