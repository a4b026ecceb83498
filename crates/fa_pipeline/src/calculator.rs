//! Unit Fee Calculator.
//!
//! One breakdown per unit: each category share is computed by its strategy,
//! rounded to 2 dp on its own, and the total is the rounded sum of those
//! rounded shares. Missing categories contribute zero. Never fails.

use rust_decimal::Decimal;
use tracing::warn;

use fa_algo::{
    equal_split, extras_total, heating_share, restricted_to_elevator_users, share_of, utility_share,
    RosterStats,
};
use fa_core::computed::{CalculationNotes, FeeBreakdown};
use fa_core::entities::{ExpenseCategory as C, ExpenseSnapshot, Unit};
use fa_core::money::{round2, round_to, rounded_sum};
use fa_core::variables::UtilityRule;

/// Per-request inputs shared by every unit of the request.
#[derive(Clone, Debug)]
pub struct AllocationBasis<'a> {
    pub snapshot: &'a ExpenseSnapshot,
    pub stats: RosterStats,
    pub rule: UtilityRule,
    /// Coerced Σ of the snapshot's ad-hoc extras.
    pub extras_total: Decimal,
}

impl<'a> AllocationBasis<'a> {
    /// Fold the complex-wide roster and note any missing categories once.
    pub fn new(snapshot: &'a ExpenseSnapshot, roster: &[Unit], rule: UtilityRule) -> Self {
        for cat in snapshot.missing_categories() {
            warn!(period = %snapshot.period, category = %cat, "expense category missing; contributes 0");
        }
        Self {
            snapshot,
            stats: RosterStats::from_roster(roster),
            rule,
            extras_total: extras_total(&snapshot.extras),
        }
    }

    fn amount(&self, cat: C) -> Decimal {
        self.snapshot.amount_or_zero(cat)
    }
}

/// Fee breakdown for `unit` under `basis`.
pub fn calculate_unit_fee(unit: &Unit, basis: &AllocationBasis<'_>) -> FeeBreakdown {
    let s = &basis.stats;

    let elevator = round2(restricted_to_elevator_users(basis.amount(C::Elevator), unit, s));
    let heating = round2(heating_share(basis.amount(C::FuelZone1), basis.amount(C::FuelZone2), unit, s));
    let security = round2(equal_split(basis.amount(C::Security), s));
    let janitorial = round2(equal_split(basis.amount(C::Janitorial), s));
    let electricity = round2(utility_share(basis.rule, basis.amount(C::Electricity), unit, s));
    let water = round2(utility_share(basis.rule, basis.amount(C::Water), unit, s));
    let management = round2(equal_split(basis.amount(C::Management), s));
    let extras = round2(
        utility_share(basis.rule, basis.amount(C::Miscellaneous), unit, s)
            .saturating_add(equal_split(basis.extras_total, s)),
    );

    let total = rounded_sum([elevator, heating, security, janitorial, electricity, water, management, extras]);

    FeeBreakdown {
        elevator,
        heating,
        security,
        janitorial,
        electricity,
        water,
        management,
        extras,
        total,
        notes: CalculationNotes {
            uses_elevator: unit.uses_elevator,
            heating_zone: unit.heating_zone,
            heating_capacity: unit.heating_capacity,
            area_share_pct: round_to(share_of(unit.area, Decimal::ONE_HUNDRED, s.total_area), 4),
        },
    }
}
