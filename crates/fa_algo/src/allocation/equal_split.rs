//! Equal split across every active unit of the complex.
//!
//! Contract:
//! - share = amount / active units complex-wide (not the queried block).
//! - Used for security, building staff, management, ad-hoc extras, and for
//!   electricity/water/miscellaneous under `UtilityRule::EqualSplit`.
//! - No active units → zero.

use rust_decimal::Decimal;

use crate::{share_of, RosterStats};

pub fn equal_split(amount: Decimal, stats: &RosterStats) -> Decimal {
    share_of(amount, Decimal::ONE, Decimal::from(stats.active_units))
}
