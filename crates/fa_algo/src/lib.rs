// crates/fa_algo/src/lib.rs
//! Allocation strategy set.
//!
//! Every strategy is a pure function of `(category amount, target unit,
//! roster statistics)` and returns the **unrounded** share; rounding to 2 dp
//! is the caller's job so that shares and totals can be rounded
//! independently. Any zero denominator yields a zero share.

#![forbid(unsafe_code)]

use rust_decimal::Decimal;

use fa_core::entities::{HeatingZone, Unit};

pub use fa_core::computed::AllocationMethod;
pub use fa_core::variables::UtilityRule;

// ----------------------------- Strategies (public surface) ---------------------------

pub mod allocation {
    pub mod equal_split;
    pub mod floor_area;
    pub mod heating;
    pub mod restricted;

    pub use equal_split::equal_split;
    pub use floor_area::floor_area_pro_rata;
    pub use heating::{heating_share, zone1_capacity_pro_rata, zone2_equal};
    pub use restricted::restricted_to_elevator_users;
}

pub mod coerce;

pub use allocation::{
    equal_split, floor_area_pro_rata, heating_share, restricted_to_elevator_users,
    zone1_capacity_pro_rata, zone2_equal,
};
pub use coerce::{coerce_amount, extras_total};

// ----------------------------- Roster denominators -----------------------------------

/// Complex-wide denominators, computed once per request from the full
/// active roster (never from a single block).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RosterStats {
    pub active_units: u32,
    pub total_area: Decimal,
    pub elevator_users: u32,
    pub zone1_units: u32,
    pub zone1_capacity: Decimal,
    pub zone2_units: u32,
}

impl RosterStats {
    /// Fold the roster; inactive units are ignored. Decimal sums saturate.
    pub fn from_roster(roster: &[Unit]) -> Self {
        roster.iter().filter(|u| u.active).fold(Self::default(), |mut s, u| {
            s.active_units += 1;
            s.total_area = s.total_area.saturating_add(u.area);
            if u.uses_elevator {
                s.elevator_users += 1;
            }
            match u.heating_zone {
                HeatingZone::One => {
                    s.zone1_units += 1;
                    s.zone1_capacity = s.zone1_capacity.saturating_add(u.heating_capacity);
                }
                HeatingZone::Two => s.zone2_units += 1,
            }
            s
        })
    }
}

// ----------------------------- Shared helpers -----------------------------------------

/// `amount * num / den`, multiply first; zero when `den <= 0`.
/// Falls back to divide-first if the product would overflow.
pub fn share_of(amount: Decimal, num: Decimal, den: Decimal) -> Decimal {
    if den <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    amount
        .checked_mul(num)
        .and_then(|p| p.checked_div(den))
        .or_else(|| amount.checked_div(den).and_then(|q| q.checked_mul(num)))
        .unwrap_or(Decimal::ZERO)
}

/// Share under the selected utility rule (electricity, water, miscellaneous).
pub fn utility_share(rule: UtilityRule, amount: Decimal, unit: &Unit, stats: &RosterStats) -> Decimal {
    match rule {
        UtilityRule::EqualSplit => equal_split(amount, stats),
        UtilityRule::FloorArea => floor_area_pro_rata(amount, unit, stats),
    }
}

/// Method label for the selected utility rule.
pub fn utility_method(rule: UtilityRule) -> AllocationMethod {
    match rule {
        UtilityRule::EqualSplit => AllocationMethod::EqualSplit,
        UtilityRule::FloorArea => AllocationMethod::FloorAreaProRata,
    }
}
