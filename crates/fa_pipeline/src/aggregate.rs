//! Block Aggregator: fold per-unit results into a `BlockSummary`.
//!
//! `total_fee` is the rounded sum of unit totals, `average_fee` is
//! `total_fee / unit_count` rounded to 2 dp. Floors partition strictly on
//! `floor == 0` (ground) vs `floor > 0` (upper). An empty block is an error,
//! never a NaN average.

use rust_decimal::Decimal;

use fa_core::computed::{BlockSummary, UnitFee};
use fa_core::money::{round2, rounded_sum};
use fa_core::{BlockLetter, Period};

use crate::{PipelineError, PipelineResult};

pub fn summarize_block(block: &BlockLetter, period: Period, fees: &[UnitFee]) -> PipelineResult<BlockSummary> {
    if fees.is_empty() {
        return Err(PipelineError::EmptyBlock { block: block.to_string(), period: period.to_string() });
    }
    let unit_count = fees.len() as u32;
    let total_fee = rounded_sum(fees.iter().map(|f| f.fees.total));
    let average_fee = round2(total_fee / Decimal::from(unit_count));

    Ok(BlockSummary {
        block: block.clone(),
        unit_count,
        total_fee,
        average_fee,
        ground_floor_units: fees.iter().filter(|f| f.unit.floor == 0).count() as u32,
        upper_floor_units: fees.iter().filter(|f| f.unit.floor > 0).count() as u32,
    })
}
