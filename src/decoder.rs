//! Swap log payload decoding.
//!
//! A Uniswap V3 `Swap` log packs `amount0` and `amount1` into its first two
//! 32-byte words as signed (two's-complement) big-endian 256-bit integers.
//! Decoding is pure: the same payload always yields the same amounts.

use alloy_primitives::{I256, U256};

use crate::error::{AppError, Result};
use crate::types::DecodedAmounts;

/// Hex characters in one 32-byte ABI word.
const WORD_HEX_CHARS: usize = 64;

/// Decode a swap log payload into its two signed token amounts.
///
/// An optional leading `0x` marker is stripped. Anything shorter than two
/// words after stripping, or containing non-hex characters in those words,
/// is malformed. Trailing words (sqrtPrice, liquidity, tick) are ignored.
pub fn decode_swap_log(data: &str) -> Result<DecodedAmounts> {
    let raw = data.strip_prefix("0x").unwrap_or(data);
    let head = raw.get(..WORD_HEX_CHARS * 2).ok_or_else(|| {
        AppError::MalformedPayload(format!(
            "payload has {} hex chars, need at least {}",
            raw.len(),
            WORD_HEX_CHARS * 2
        ))
    })?;
    let bytes = hex::decode(head)
        .map_err(|e| AppError::MalformedPayload(format!("non-hex payload: {e}")))?;

    Ok(DecodedAmounts {
        amount0: decode_int256(&bytes[0..32])?,
        amount1: decode_int256(&bytes[32..64])?,
    })
}

/// Decode one 32-byte word as a two's-complement `I256`.
fn decode_int256(bytes: &[u8]) -> Result<I256> {
    if bytes.len() != 32 {
        return Err(AppError::MalformedPayload(format!(
            "int256 word must be 32 bytes, got {}",
            bytes.len()
        )));
    }
    Ok(I256::from_raw(U256::from_be_slice(bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(amount0: I256, amount1: I256) -> String {
        let mut payload = String::with_capacity(WORD_HEX_CHARS * 2);
        payload.push_str(&hex::encode(amount0.to_be_bytes::<32>()));
        payload.push_str(&hex::encode(amount1.to_be_bytes::<32>()));
        payload
    }

    fn i256(v: i128) -> I256 {
        I256::try_from(v).unwrap()
    }

    #[test]
    fn round_trips_zero() {
        let decoded = decode_swap_log(&encode(I256::ZERO, I256::ZERO)).unwrap();
        assert_eq!(decoded.amount0, I256::ZERO);
        assert_eq!(decoded.amount1, I256::ZERO);
    }

    #[test]
    fn round_trips_mixed_signs() {
        let decoded =
            decode_swap_log(&encode(i256(-1_234_567_890), i256(987_654_321))).unwrap();
        assert_eq!(decoded.amount0, i256(-1_234_567_890));
        assert_eq!(decoded.amount1, i256(987_654_321));
    }

    #[test]
    fn round_trips_full_range_extremes() {
        let decoded = decode_swap_log(&encode(I256::MIN, I256::MAX)).unwrap();
        assert_eq!(decoded.amount0, I256::MIN);
        assert_eq!(decoded.amount1, I256::MAX);

        let decoded = decode_swap_log(&encode(I256::MAX, I256::MIN)).unwrap();
        assert_eq!(decoded.amount0, I256::MAX);
        assert_eq!(decoded.amount1, I256::MIN);
    }

    #[test]
    fn minus_one_is_all_ff() {
        let payload = encode(I256::MINUS_ONE, I256::ONE);
        assert!(payload.starts_with(&"f".repeat(64)));
        let decoded = decode_swap_log(&payload).unwrap();
        assert_eq!(decoded.amount0, I256::MINUS_ONE);
        assert_eq!(decoded.amount1, I256::ONE);
    }

    #[test]
    fn strips_leading_marker() {
        let bare = encode(i256(42), i256(-42));
        let prefixed = format!("0x{bare}");
        assert_eq!(
            decode_swap_log(&prefixed).unwrap(),
            decode_swap_log(&bare).unwrap()
        );
    }

    #[test]
    fn ignores_trailing_words() {
        let mut payload = encode(i256(7), i256(-7));
        payload.push_str(&"0".repeat(WORD_HEX_CHARS * 3));
        let decoded = decode_swap_log(&payload).unwrap();
        assert_eq!(decoded.amount0, i256(7));
        assert_eq!(decoded.amount1, i256(-7));
    }

    #[test]
    fn rejects_short_payload() {
        let short = &encode(i256(1), i256(1))[..127];
        assert!(matches!(
            decode_swap_log(short),
            Err(AppError::MalformedPayload(_))
        ));
        assert!(matches!(
            decode_swap_log("0x"),
            Err(AppError::MalformedPayload(_))
        ));
    }

    #[test]
    fn rejects_non_hex_characters() {
        let mut bad = encode(i256(1), i256(1));
        bad.replace_range(10..11, "g");
        assert!(matches!(
            decode_swap_log(&bad),
            Err(AppError::MalformedPayload(_))
        ));
    }
}
