//! Money rounding helpers.
//!
//! All currency figures are `Decimal`. Category shares and totals are rounded
//! independently to 2 dp (midpoint away from zero) and rescaled so that every
//! rounded value carries exactly two fractional digits. This keeps serialized
//! output byte-stable across runs (`20.00`, never `20`).

use rust_decimal::{Decimal, RoundingStrategy};

/// Fractional digits for currency values.
pub const MONEY_DP: u32 = 2;

/// Round to `dp` places (midpoint away from zero) with a fixed scale of `dp`.
#[inline]
pub fn round_to(value: Decimal, dp: u32) -> Decimal {
    let mut r = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    r.rescale(dp);
    r
}

/// Round a currency value to 2 dp.
#[inline]
pub fn round2(value: Decimal) -> Decimal {
    round_to(value, MONEY_DP)
}

/// Sum already-rounded values and round the sum again. The sum saturates at
/// the `Decimal` range.
pub fn rounded_sum<I: IntoIterator<Item = Decimal>>(values: I) -> Decimal {
    round2(values.into_iter().fold(Decimal::ZERO, Decimal::saturating_add))
}

/// Currency rendering used in text exports (`1030.00`).
pub fn format2(value: Decimal) -> String {
    round2(value).to_string()
}
