//! Floor-area pro-rata.
//!
//! share = amount × (unit area / Σ area of all active units). Selected for
//! electricity/water/miscellaneous by `UtilityRule::FloorArea`.

use rust_decimal::Decimal;

use fa_core::entities::Unit;

use crate::{share_of, RosterStats};

pub fn floor_area_pro_rata(amount: Decimal, unit: &Unit, stats: &RosterStats) -> Decimal {
    share_of(amount, unit.area, stats.total_area)
}
