//! Restricted-to-users split (elevator).
//!
//! share = amount / count of elevator-using units complex-wide, for users
//! only. Non-users pay exactly zero; no users at all → zero.

use rust_decimal::Decimal;

use fa_core::entities::Unit;

use crate::{share_of, RosterStats};

pub fn restricted_to_elevator_users(amount: Decimal, unit: &Unit, stats: &RosterStats) -> Decimal {
    if !unit.uses_elevator {
        return Decimal::ZERO;
    }
    share_of(amount, Decimal::ONE, Decimal::from(stats.elevator_users))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::{d, unit};
    use fa_core::entities::HeatingZone;

    #[test]
    fn users_share_and_non_users_pay_nothing() {
        let r = vec![
            unit(1, "10", HeatingZone::One, "0", false),
            unit(101, "10", HeatingZone::One, "0", true),
            unit(201, "10", HeatingZone::Two, "0", true),
        ];
        let s = RosterStats::from_roster(&r);
        assert_eq!(restricted_to_elevator_users(d("840"), &r[0], &s), Decimal::ZERO);
        assert_eq!(restricted_to_elevator_users(d("840"), &r[1], &s), d("420"));
        assert_eq!(restricted_to_elevator_users(d("840"), &r[2], &s), d("420"));
    }
}
