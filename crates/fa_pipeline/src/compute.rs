//! Compute request → cache bundle.
//!
//! Loads the period's expense snapshot, the block's units and the
//! complex-wide roster, runs the calculator per unit, aggregates, builds the
//! detail table and upserts the bundle under `{block}_{period}_unit_detail`.
//! A request narrowed to one unit number is computed but not cached, so the
//! block bundle always describes the whole block.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use fa_core::computed::{BlockSummary, CacheBundle, CacheKey, ExpenseDetailRow, UnitDescriptor, UnitFee};
use fa_core::money::format2;
use fa_core::{BlockLetter, Period};
use fa_io::hasher::bundle_digest;
use fa_io::loader::{check_roster, check_snapshot};
use fa_io::UnitFilter;

use crate::aggregate::summarize_block;
use crate::calculator::{calculate_unit_fee, AllocationBasis};
use crate::detail::build_expense_rows;
use crate::{EngineCtx, PipelineError, PipelineResult};

/// `{ block, period, unit_number? }`; legacy field names accepted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputeRequest {
    #[serde(alias = "blockLetter", alias = "blokHarfi", default)]
    pub block: String,
    #[serde(default)]
    pub period: String,
    #[serde(alias = "unitNumber", alias = "daireNo", default, skip_serializing_if = "Option::is_none")]
    pub unit_number: Option<u32>,
}

impl ComputeRequest {
    pub fn new(block: impl Into<String>, period: impl Into<String>) -> Self {
        Self { block: block.into(), period: period.into(), unit_number: None }
    }

    /// Required fields present and well-formed.
    pub fn parse(&self) -> PipelineResult<(BlockLetter, Period)> {
        if self.block.trim().is_empty() || self.period.trim().is_empty() {
            return Err(PipelineError::Validation("block letter and period are required".into()));
        }
        let block = self.block.parse().map_err(|e: fa_core::CoreError| PipelineError::Validation(e.to_string()))?;
        let period = self.period.parse().map_err(|e: fa_core::CoreError| PipelineError::Validation(e.to_string()))?;
        Ok((block, period))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputeTotals {
    pub unit_count: u32,
    pub total_fee: Decimal,
    /// Two-decimal rendering of the average.
    pub average_fee: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputeData {
    pub block_summary: BlockSummary,
    pub unit_fee_breakdowns: Vec<UnitFee>,
    pub expense_detail_rows: Vec<ExpenseDetailRow>,
    pub totals: ComputeTotals,
}

impl From<CacheBundle> for ComputeData {
    fn from(b: CacheBundle) -> Self {
        let totals = ComputeTotals {
            unit_count: b.summary.unit_count,
            total_fee: b.summary.total_fee,
            average_fee: format2(b.summary.average_fee),
        };
        Self { block_summary: b.summary, unit_fee_breakdowns: b.units, expense_detail_rows: b.expense_rows, totals }
    }
}

/// Produce the bundle for `(block, period)` without touching the cache.
pub fn compute_bundle(
    ctx: EngineCtx<'_>,
    block: &BlockLetter,
    period: Period,
    unit_number: Option<u32>,
) -> PipelineResult<CacheBundle> {
    debug!(%block, %period, ?unit_number, "compute: loading inputs");

    let snapshot = ctx
        .store
        .find_expense_snapshot(period)?
        .ok_or_else(|| PipelineError::NotFound(format!("no expense snapshot for period {period}")))?;
    check_snapshot(&snapshot)?;

    let filter = UnitFilter { block: Some(block.clone()), unit_number };
    let units = ctx.store.list_active_units(&filter)?;
    if units.is_empty() {
        return Err(match unit_number {
            Some(n) => PipelineError::NotFound(format!("unit {n} in block {block}")),
            None => PipelineError::EmptyBlock { block: block.to_string(), period: period.to_string() },
        });
    }

    let roster = ctx.store.list_all_active_units()?;
    check_roster(&roster, ctx.config)?;

    let rule = ctx.config.utility_rule_for(snapshot.utility_rule);
    let basis = AllocationBasis::new(&snapshot, &roster, rule);

    let fees: Vec<UnitFee> = units
        .iter()
        .map(|u| UnitFee { unit: UnitDescriptor::from(u), fees: calculate_unit_fee(u, &basis), period })
        .collect();
    let summary = summarize_block(block, period, &fees)?;

    let exemplar_no = ctx.config.exemplar.unit_number_for(block);
    let exemplar = roster.iter().find(|u| &u.block == block && u.unit_number == exemplar_no);
    if exemplar.is_none() {
        warn!(%block, %period, unit = exemplar_no, "exemplar unit not in roster; unit-dependent detail rows show 0");
    }
    let expense_rows = build_expense_rows(&basis, exemplar);

    let key = CacheKey::unit_detail(block.clone(), period);
    let mut bundle = CacheBundle {
        key: key.to_string(),
        block: block.clone(),
        period,
        computed_at: ctx.clock.now(),
        units: fees,
        summary,
        expense_rows,
        digest: String::new(),
    };
    bundle.digest = bundle_digest(&bundle)?;
    Ok(bundle)
}

/// Compute the whole block and replace its cache bundle.
pub fn compute_and_cache(ctx: EngineCtx<'_>, block: &BlockLetter, period: Period) -> PipelineResult<CacheBundle> {
    let bundle = compute_bundle(ctx, block, period, None)?;
    let key = CacheKey::unit_detail(block.clone(), period);
    ctx.store.upsert_cache_bundle(&key, &bundle)?;
    info!(
        key = %key,
        units = bundle.summary.unit_count,
        total = %bundle.summary.total_fee,
        digest = %bundle.digest,
        "fee allocation computed and cached"
    );
    Ok(bundle)
}

/// Handle a compute request.
pub fn compute(ctx: EngineCtx<'_>, req: &ComputeRequest) -> PipelineResult<ComputeData> {
    let (block, period) = req.parse()?;
    let bundle = match req.unit_number {
        None => compute_and_cache(ctx, &block, period)?,
        Some(n) => {
            debug!(%block, %period, unit = n, "single-unit request; cache untouched");
            compute_bundle(ctx, &block, period, Some(n))?
        }
    };
    Ok(ComputeData::from(bundle))
}
