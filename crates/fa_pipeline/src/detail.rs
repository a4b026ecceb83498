//! Expense Detail Table Builder.
//!
//! Row order is fixed: fuel zone 1, fuel zone 2, elevator, security,
//! janitorial, electricity, water, management, miscellaneous, then the ad-hoc
//! extras in source order. Each row carries the category total and the
//! exemplar unit's share. Without an exemplar, unit-independent rows keep
//! their share and unit-dependent rows show zero.

use rust_decimal::Decimal;

use fa_algo::{
    coerce_amount, equal_split, restricted_to_elevator_users, utility_method, utility_share,
    zone1_capacity_pro_rata, zone2_equal, AllocationMethod,
};
use fa_core::computed::{ExpenseDetailRow, RowKind};
use fa_core::entities::{ExpenseCategory as C, Unit};
use fa_core::money::round2;
use fa_core::variables::UtilityRule;

use crate::calculator::AllocationBasis;

pub fn build_expense_rows(basis: &AllocationBasis<'_>, exemplar: Option<&Unit>) -> Vec<ExpenseDetailRow> {
    let s = &basis.stats;
    let snap = basis.snapshot;
    let per_unit = |f: &dyn Fn(&Unit) -> Decimal| exemplar.map_or(Decimal::ZERO, f);

    let utility = |cat: C| -> Decimal {
        let amount = snap.amount_or_zero(cat);
        match basis.rule {
            UtilityRule::EqualSplit => equal_split(amount, s),
            UtilityRule::FloorArea => per_unit(&|u: &Unit| utility_share(basis.rule, amount, u, s)),
        }
    };

    let fixed = [
        (C::FuelZone1, per_unit(&|u: &Unit| zone1_capacity_pro_rata(snap.amount_or_zero(C::FuelZone1), u, s)),
            AllocationMethod::HeatingCapacityProRata, RowKind::Heating),
        (C::FuelZone2, per_unit(&|u: &Unit| zone2_equal(snap.amount_or_zero(C::FuelZone2), u, s)),
            AllocationMethod::EqualSplit, RowKind::Heating),
        (C::Elevator, per_unit(&|u: &Unit| restricted_to_elevator_users(snap.amount_or_zero(C::Elevator), u, s)),
            AllocationMethod::RestrictedToElevatorUsers, RowKind::Elevator),
        (C::Security, equal_split(snap.amount_or_zero(C::Security), s), AllocationMethod::EqualSplit, RowKind::Fixed),
        (C::Janitorial, equal_split(snap.amount_or_zero(C::Janitorial), s), AllocationMethod::EqualSplit, RowKind::Fixed),
        (C::Electricity, utility(C::Electricity), utility_method(basis.rule), RowKind::Fixed),
        (C::Water, utility(C::Water), utility_method(basis.rule), RowKind::Fixed),
        (C::Management, equal_split(snap.amount_or_zero(C::Management), s), AllocationMethod::EqualSplit, RowKind::Fixed),
        (C::Miscellaneous, utility(C::Miscellaneous), utility_method(basis.rule), RowKind::Fixed),
    ];

    let mut rows: Vec<ExpenseDetailRow> = fixed
        .into_iter()
        .map(|(cat, share, method, kind)| ExpenseDetailRow {
            label: cat.label().to_string(),
            description: snap.description(cat),
            total: round2(snap.amount_or_zero(cat)),
            exemplar_share: round2(share),
            method,
            kind,
        })
        .collect();

    rows.extend(snap.extras.iter().map(|e| {
        let amount = coerce_amount(&e.amount);
        ExpenseDetailRow {
            label: e.name.clone(),
            description: e.description.clone().unwrap_or_default(),
            total: round2(amount),
            exemplar_share: round2(equal_split(amount, s)),
            method: AllocationMethod::EqualSplit,
            kind: RowKind::Extra,
        }
    }));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::{d, roster, snapshot};

    fn labels(rows: &[ExpenseDetailRow]) -> Vec<&str> {
        rows.iter().map(|r| r.label.as_str()).collect()
    }

    #[test]
    fn fixed_order_then_extras() {
        let r = roster();
        let snap = snapshot();
        let b = AllocationBasis::new(&snap, &r, UtilityRule::EqualSplit);
        let rows = build_expense_rows(&b, r.iter().find(|u| u.block.as_str() == "A" && u.unit_number == 201));
        assert_eq!(
            labels(&rows),
            vec![
                "Heating Zone 1 Fuel",
                "Heating Zone 2 Fuel",
                "Elevator",
                "Security",
                "Building Staff",
                "Electricity",
                "Water",
                "Management",
                "Miscellaneous",
                "Garden Landscaping",
            ]
        );
        assert_eq!(rows[0].exemplar_share, d("1000.00"));
        assert_eq!(rows[1].exemplar_share, d("0.00"));
        assert_eq!(rows[2].exemplar_share, d("0.00"));
        assert_eq!(rows[3].exemplar_share, d("20.00"));
        assert_eq!(rows[8].exemplar_share, d("1.00"));
        assert_eq!(rows[9].exemplar_share, d("10.00"));
        assert_eq!(rows[9].kind, RowKind::Extra);
        assert_eq!(rows[2].method, AllocationMethod::RestrictedToElevatorUsers);
        assert_eq!(rows[0].description, "Fuel for the zone 1 heating plant");
    }

    #[test]
    fn zone2_exemplar_shares() {
        let r = roster();
        let snap = snapshot();
        let b = AllocationBasis::new(&snap, &r, UtilityRule::EqualSplit);
        let ex = r.iter().find(|u| u.block.as_str() == "D" && u.unit_number == 201);
        let rows = build_expense_rows(&b, ex);
        assert_eq!(rows[0].exemplar_share, d("0.00"));
        assert_eq!(rows[1].exemplar_share, d("100.00"));
        assert_eq!(rows[2].exemplar_share, d("20.00"));
    }

    #[test]
    fn missing_exemplar_zeroes_unit_dependent_rows() {
        let r = roster();
        let snap = snapshot();
        let b = AllocationBasis::new(&snap, &r, UtilityRule::FloorArea);
        let rows = build_expense_rows(&b, None);
        assert_eq!(rows[0].exemplar_share, d("0.00"));
        assert_eq!(rows[3].exemplar_share, d("20.00"));
        assert_eq!(rows[5].exemplar_share, d("0.00"));
        assert_eq!(rows[5].method, AllocationMethod::FloorAreaProRata);
        assert_eq!(rows[9].exemplar_share, d("10.00"));
    }

    #[test]
    fn rows_are_stable_across_runs() {
        let r = roster();
        let snap = snapshot();
        let b = AllocationBasis::new(&snap, &r, UtilityRule::EqualSplit);
        assert_eq!(build_expense_rows(&b, r.first()), build_expense_rows(&b, r.first()));
    }
}
