//! Decimal to American odds conversion.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Convert decimal odds to American odds.
///
/// Decimal odds at or above 2.0 convert to positive American odds
/// (`+(price - 1) * 100`); odds between 1.0 and 2.0 convert to negative
/// American odds (`-100 / (price - 1)`). Returns `None` for prices at or
/// below 1.0, where the conversion is undefined.
pub fn decimal_to_american(price: Decimal) -> Option<i64> {
    if price <= Decimal::ONE {
        return None;
    }

    if price >= Decimal::TWO {
        round_whole((price - Decimal::ONE) * Decimal::ONE_HUNDRED).to_i64()
    } else {
        round_whole(Decimal::ONE_HUNDRED / (price - Decimal::ONE))
            .to_i64()
            .map(|odds| -odds)
    }
}

/// Format American odds with their conventional sign prefix.
pub fn format_american(american: i64) -> String {
    if american >= 0 {
        format!("+{}", american)
    } else {
        american.to_string()
    }
}

// Half-away-from-zero, matching the display rounding used for stakes.
fn round_whole(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}
