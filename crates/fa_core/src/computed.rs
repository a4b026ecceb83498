//! Computed, engine-produced types: per-unit fee breakdowns, block summaries,
//! expense detail rows, and the cache bundle that persists them.

use core::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::entities::{HeatingZone, Unit};
use crate::tokens::{BlockLetter, Period};

/* -------------------------------------------------------------------------- */
/*                             Allocation methods                             */
/* -------------------------------------------------------------------------- */

/// How a category total is turned into a unit's share.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationMethod {
    EqualSplit,
    FloorAreaProRata,
    HeatingCapacityProRata,
    RestrictedToElevatorUsers,
}

impl AllocationMethod {
    pub fn label(self) -> &'static str {
        match self {
            AllocationMethod::EqualSplit => "Equal Split",
            AllocationMethod::FloorAreaProRata => "Floor-Area Pro-Rata",
            AllocationMethod::HeatingCapacityProRata => "Heating-Capacity Pro-Rata",
            AllocationMethod::RestrictedToElevatorUsers => "Restricted-to-Users-of-Elevator",
        }
    }
}

impl fmt::Display for AllocationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/* -------------------------------------------------------------------------- */
/*                               Fee breakdowns                               */
/* -------------------------------------------------------------------------- */

/// Informational notes attached to each breakdown.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationNotes {
    pub uses_elevator: bool,
    pub heating_zone: HeatingZone,
    pub heating_capacity: Decimal,
    /// Unit area as a percentage of complex area, 4 dp.
    pub area_share_pct: Decimal,
}

/// Per-unit, per-period cost breakdown. Every field is rounded to 2 dp on its
/// own; `total` is the rounded sum of the rounded category shares.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeBreakdown {
    pub elevator: Decimal,
    pub heating: Decimal,
    pub security: Decimal,
    pub janitorial: Decimal,
    pub electricity: Decimal,
    pub water: Decimal,
    pub management: Decimal,
    /// Miscellaneous total plus ad-hoc extras.
    pub extras: Decimal,
    pub total: Decimal,
    pub notes: CalculationNotes,
}

impl FeeBreakdown {
    /// The eight category shares in fixed order.
    pub fn shares(&self) -> [Decimal; 8] {
        [
            self.elevator,
            self.heating,
            self.security,
            self.janitorial,
            self.electricity,
            self.water,
            self.management,
            self.extras,
        ]
    }
}

/// Descriptive attributes of the unit a breakdown belongs to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitDescriptor {
    pub global_id: String,
    pub display_name: String,
    pub block: BlockLetter,
    pub floor: i32,
    pub floor_label: String,
    pub unit_number: u32,
    pub unit_type: String,
    pub area: Decimal,
    pub uses_elevator: bool,
    pub heating_zone: HeatingZone,
}

impl From<&Unit> for UnitDescriptor {
    fn from(u: &Unit) -> Self {
        Self {
            global_id: u.global_id.clone(),
            display_name: u.display_name.clone(),
            block: u.block.clone(),
            floor: u.floor,
            floor_label: u.floor_label.clone(),
            unit_number: u.unit_number,
            unit_type: u.unit_type.clone(),
            area: u.area,
            uses_elevator: u.uses_elevator,
            heating_zone: u.heating_zone,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitFee {
    pub unit: UnitDescriptor,
    pub fees: FeeBreakdown,
    pub period: Period,
}

/// Block-level fold of per-unit results.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSummary {
    pub block: BlockLetter,
    pub unit_count: u32,
    pub total_fee: Decimal,
    pub average_fee: Decimal,
    pub ground_floor_units: u32,
    pub upper_floor_units: u32,
}

/* -------------------------------------------------------------------------- */
/*                             Expense detail rows                            */
/* -------------------------------------------------------------------------- */

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKind {
    Heating,
    Elevator,
    Fixed,
    Extra,
}

/// One expense line with an exemplar unit's share, for display/export.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseDetailRow {
    pub label: String,
    pub description: String,
    pub total: Decimal,
    pub exemplar_share: Decimal,
    pub method: AllocationMethod,
    pub kind: RowKind,
}

/* -------------------------------------------------------------------------- */
/*                                Cache bundle                                */
/* -------------------------------------------------------------------------- */

/// Composite cache key: block + period + kind tag.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct CacheKey {
    pub block: BlockLetter,
    pub period: Period,
    pub kind: &'static str,
}

impl CacheKey {
    /// Kind tag of the per-unit detail computation.
    pub const UNIT_DETAIL: &'static str = "unit_detail";

    pub fn unit_detail(block: BlockLetter, period: Period) -> Self {
        Self { block, period, kind: Self::UNIT_DETAIL }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}", self.block, self.period, self.kind)
    }
}

/// Persisted snapshot of all computed results for one (block, period).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheBundle {
    pub key: String,
    pub block: BlockLetter,
    pub period: Period,
    pub computed_at: DateTime<Utc>,
    pub units: Vec<UnitFee>,
    pub summary: BlockSummary,
    pub expense_rows: Vec<ExpenseDetailRow>,
    /// SHA-256 of the canonical bundle content (timestamp excluded).
    pub digest: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_key_is_block_period_kind() {
        let k = CacheKey::unit_detail("a".parse().unwrap(), "2024-01".parse().unwrap());
        assert_eq!(k.to_string(), "A_2024-01_unit_detail");
    }

    #[test]
    fn method_labels_are_stable() {
        assert_eq!(AllocationMethod::EqualSplit.to_string(), "Equal Split");
        assert_eq!(
            serde_json::to_string(&AllocationMethod::HeatingCapacityProRata).unwrap(),
            "\"heating_capacity_pro_rata\""
        );
    }
}
