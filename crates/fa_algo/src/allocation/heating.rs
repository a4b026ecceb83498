//! Heating fuel allocation per zone.
//!
//! - Zone 1: fuel₁ × (unit capacity / Σ capacity of zone-1 units).
//! - Zone 2: fuel₂ / count of zone-2 units.
//! - A unit only ever pays for its own zone; the other zone's share is zero.
//! - Zero capacity sum or empty zone → zero.

use rust_decimal::Decimal;

use fa_core::entities::{HeatingZone, Unit};

use crate::{share_of, RosterStats};

/// Zone-1 share; zero for zone-2 units.
pub fn zone1_capacity_pro_rata(fuel_zone1: Decimal, unit: &Unit, stats: &RosterStats) -> Decimal {
    if unit.heating_zone != HeatingZone::One {
        return Decimal::ZERO;
    }
    share_of(fuel_zone1, unit.heating_capacity, stats.zone1_capacity)
}

/// Zone-2 share; zero for zone-1 units.
pub fn zone2_equal(fuel_zone2: Decimal, unit: &Unit, stats: &RosterStats) -> Decimal {
    if unit.heating_zone != HeatingZone::Two {
        return Decimal::ZERO;
    }
    share_of(fuel_zone2, Decimal::ONE, Decimal::from(stats.zone2_units))
}

/// Heating share for a unit from both zone totals.
pub fn heating_share(fuel_zone1: Decimal, fuel_zone2: Decimal, unit: &Unit, stats: &RosterStats) -> Decimal {
    zone1_capacity_pro_rata(fuel_zone1, unit, stats).saturating_add(zone2_equal(fuel_zone2, unit, stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::{d, unit};

    fn roster() -> Vec<Unit> {
        vec![
            unit(101, "100", HeatingZone::One, "450", false),
            unit(102, "100", HeatingZone::One, "4050", false),
            unit(201, "100", HeatingZone::Two, "0", true),
            unit(202, "100", HeatingZone::Two, "0", true),
        ]
    }

    #[test]
    fn zone1_is_capacity_weighted() {
        let r = roster();
        let s = RosterStats::from_roster(&r);
        assert_eq!(zone1_capacity_pro_rata(d("10000"), &r[0], &s), d("1000"));
        assert_eq!(zone1_capacity_pro_rata(d("10000"), &r[1], &s), d("9000"));
        assert_eq!(zone1_capacity_pro_rata(d("10000"), &r[2], &s), Decimal::ZERO);
    }

    #[test]
    fn zone2_is_equal_within_zone() {
        let r = roster();
        let s = RosterStats::from_roster(&r);
        assert_eq!(zone2_equal(d("900"), &r[2], &s), d("450"));
        assert_eq!(zone2_equal(d("900"), &r[0], &s), Decimal::ZERO);
    }

    #[test]
    fn combined_share_only_charges_own_zone() {
        let r = roster();
        let s = RosterStats::from_roster(&r);
        assert_eq!(heating_share(d("10000"), d("900"), &r[0], &s), d("1000"));
        assert_eq!(heating_share(d("10000"), d("900"), &r[3], &s), d("450"));
    }

    #[test]
    fn zero_capacity_zone_yields_zero() {
        let r = vec![unit(101, "100", HeatingZone::One, "0", false)];
        let s = RosterStats::from_roster(&r);
        assert_eq!(zone1_capacity_pro_rata(d("10000"), &r[0], &s), Decimal::ZERO);
    }
}
