//! fa_pipeline: request orchestration for the fee-allocation engine.
//!
//! Stages per compute request: load snapshots → calculate each unit →
//! aggregate the block → build the expense detail table → upsert the cache
//! bundle. All store access goes through `fa_io::Store`; all arithmetic
//! through `fa_algo`. Identical inputs produce identical bundles (the
//! computation timestamp aside).

#![forbid(unsafe_code)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use fa_core::variables::EngineConfig;
use fa_io::{IoError, Store};

pub mod aggregate;
pub mod blocks;
pub mod calculator;
pub mod check;
pub mod compute;
pub mod detail;
pub mod register;

pub use aggregate::summarize_block;
pub use blocks::{list_blocks, BlockListing, ComplexStatistics, ZoneStatistics};
pub use calculator::{calculate_unit_fee, AllocationBasis};
pub use check::{check_data, CheckRequest, CheckResult};
pub use compute::{compute, compute_and_cache, compute_bundle, ComputeData, ComputeRequest, ComputeTotals};
pub use detail::build_expense_rows;
pub use register::{normalize_phone, submit_registration, RegistrationAck, RegistrationRequest};

// ----------------------------------- Errors -----------------------------------

/// Pipeline error taxonomy; messages carry block/period/category context.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("no active units in block {block} for period {period}")]
    EmptyBlock { block: String, period: String },

    #[error("store failure: {0}")]
    Collaborator(String),
}

impl From<IoError> for PipelineError {
    fn from(e: IoError) -> Self {
        match e {
            IoError::NotFound(m) => PipelineError::NotFound(m),
            IoError::Invalid(m) => PipelineError::Validation(m),
            other => PipelineError::Collaborator(other.to_string()),
        }
    }
}

pub type PipelineResult<T> = Result<T, PipelineError>;

// ----------------------------------- Clock -----------------------------------

/// Source of computation timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always returns the same instant.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

// ----------------------------------- Context -----------------------------------

/// Everything a request needs besides its own parameters.
#[derive(Clone, Copy)]
pub struct EngineCtx<'a> {
    pub store: &'a dyn Store,
    pub config: &'a EngineConfig,
    pub clock: &'a dyn Clock,
}

impl<'a> EngineCtx<'a> {
    pub fn new(store: &'a dyn Store, config: &'a EngineConfig, clock: &'a dyn Clock) -> Self {
        Self { store, config, clock }
    }
}

// ----------------------------------- Response envelope -----------------------------------

/// `{ success, data?, message? }` wrapper for produced interfaces.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self { success: true, data: Some(data), message: Some(message.into()) }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self { success: false, data: None, message: Some(message.into()) }
    }

    pub fn from_result(r: PipelineResult<T>, ok_message: &str) -> Self {
        match r {
            Ok(data) => Self::ok(data, ok_message),
            Err(e) => Self::fail(e.to_string()),
        }
    }
}

/// Shared fixtures for in-crate tests.
#[cfg(test)]
pub(crate) mod testkit {
    use chrono::TimeZone;
    use fa_core::entities::{ExpenseSnapshot, ExtraExpense, HeatingZone, RawAmount, Unit};
    use fa_core::Decimal;
    use fa_io::MemoryStore;

    use super::*;

    pub fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    pub fn clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2024, 2, 1, 9, 30, 0).unwrap())
    }

    pub fn unit(block: &str, floor: i32, no: u32, zone: HeatingZone, cap: &str, elevator: bool) -> Unit {
        Unit {
            global_id: format!("{block}-{no}"),
            block: block.parse().unwrap(),
            floor,
            floor_label: if floor == 0 { "Ground".into() } else { format!("Floor {floor}") },
            unit_number: no,
            display_name: format!("{block} Block No {no}"),
            unit_type: "3+1".into(),
            area: d("10"),
            uses_elevator: elevator,
            heating_zone: zone,
            heating_capacity: d(cap),
            active: true,
        }
    }

    /// 178 units of 10 m² each. Block A (zone 1): ten units of capacity 450
    /// (zone-1 Σ 4500), two on the ground floor, no elevator. Block D
    /// (zone 2): 168 upper-floor units, all with the elevator.
    pub fn roster() -> Vec<Unit> {
        let mut v = Vec::new();
        for i in 0..10u32 {
            let floor = (i / 2) as i32;
            let no = if floor == 0 { i + 1 } else { floor as u32 * 100 + i % 2 + 1 };
            v.push(unit("A", floor, no, HeatingZone::One, "450", false));
        }
        for i in 0..168u32 {
            let floor = (i / 8) as i32 + 1;
            v.push(unit("D", floor, floor as u32 * 100 + i % 8 + 1, HeatingZone::Two, "0", true));
        }
        v
    }

    pub fn snapshot() -> ExpenseSnapshot {
        let mut s = ExpenseSnapshot::empty("2024-01".parse().unwrap());
        s.fuel_zone1 = Some(d("10000"));
        s.fuel_zone2 = Some(d("16800"));
        s.elevator = Some(d("3360"));
        s.security = Some(d("3560"));
        s.janitorial = Some(d("1780"));
        s.electricity = Some(d("1780"));
        s.water = Some(d("890"));
        s.management = Some(d("356"));
        s.miscellaneous = Some(d("178"));
        s.extras = vec![ExtraExpense {
            name: "Garden Landscaping".into(),
            description: None,
            amount: RawAmount::Number(d("1780")),
        }];
        s
    }

    pub fn store() -> MemoryStore {
        MemoryStore::new().with_units(roster()).with_snapshot(snapshot())
    }
}
