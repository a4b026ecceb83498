//! fa_report: export reports over computed results.
//!
//! Three kinds: per-unit detail of one block, a summary across all blocks,
//! and the expense detail table followed by announcements. Reports read the
//! cache bundle when one exists and compute it otherwise. Output content is
//! deterministic for an unchanged bundle; only `generated_at` varies.

#![forbid(unsafe_code)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use fa_core::computed::CacheBundle;
use fa_core::{BlockLetter, CoreError, Period};
use fa_io::BundleFilter;
use fa_pipeline::{compute_and_cache, list_blocks, EngineCtx, PipelineError};

pub mod render_csv;
pub mod structure;

pub use structure::ReportTable;

// ===== Errors =====

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

impl From<fa_io::IoError> for ReportError {
    fn from(e: fa_io::IoError) -> Self {
        ReportError::Pipeline(e.into())
    }
}

pub type ReportResult<T> = Result<T, ReportError>;

// ===== Kinds & requests =====

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportKind {
    #[serde(alias = "daire_detay")]
    UnitDetail,
    #[serde(alias = "blok_ozeti")]
    BlockSummary,
    #[serde(alias = "gider_detay")]
    ExpenseDetail,
}

impl ReportKind {
    pub fn token(self) -> &'static str {
        match self {
            ReportKind::UnitDetail => "unit-detail",
            ReportKind::BlockSummary => "block-summary",
            ReportKind::ExpenseDetail => "expense-detail",
        }
    }
}

impl core::str::FromStr for ReportKind {
    type Err = ReportError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "unit-detail" | "daire_detay" => Ok(ReportKind::UnitDetail),
            "block-summary" | "blok_ozeti" => Ok(ReportKind::BlockSummary),
            "expense-detail" | "gider_detay" => Ok(ReportKind::ExpenseDetail),
            other => Err(ReportError::Validation(format!("unknown report kind: {other:?}"))),
        }
    }
}

impl core::fmt::Display for ReportKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.token())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRequest {
    #[serde(alias = "reportKind", alias = "raporTuru")]
    pub kind: ReportKind,
    pub period: String,
    #[serde(alias = "blockLetter", alias = "blokHarfi", default, skip_serializing_if = "Option::is_none")]
    pub block: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportOutput {
    pub kind: ReportKind,
    pub period: Period,
    /// `None` for complex-wide reports.
    pub block: Option<BlockLetter>,
    pub title: String,
    pub row_count: usize,
    pub content: String,
    pub generated_at: DateTime<Utc>,
}

// ===== Entry point =====

pub fn run_export(ctx: EngineCtx<'_>, req: &ExportRequest) -> ReportResult<ExportOutput> {
    let period: Period = req
        .period
        .trim()
        .parse()
        .map_err(|e: CoreError| ReportError::Validation(e.to_string()))?;
    let block: Option<BlockLetter> = match req.block.as_deref().map(str::trim) {
        Some(b) if !b.is_empty() => Some(b.parse().map_err(|e: CoreError| ReportError::Validation(e.to_string()))?),
        _ => None,
    };

    let (title, table, announcements, block) = match req.kind {
        ReportKind::UnitDetail => {
            let block = block
                .ok_or_else(|| ReportError::Validation("block letter is required for the unit-detail report".into()))?;
            let bundle = cached_or_computed(ctx, &block, period)?;
            let title = format!("{block} Block Unit Detail Report - {period}");
            (title, structure::unit_detail_table(&bundle), None, Some(block))
        }
        ReportKind::BlockSummary => {
            let listing = list_blocks(ctx.store)?;
            let mut rows = Vec::with_capacity(listing.blocks.len());
            for desc in &listing.blocks {
                match cached_or_computed(ctx, &desc.block, period) {
                    Ok(bundle) => rows.push((desc.clone(), bundle.summary)),
                    // A declared block without active units has no summary row.
                    Err(ReportError::Pipeline(e @ PipelineError::EmptyBlock { .. })) => {
                        warn!(block = %desc.block, %period, error = %e, "block skipped in summary report")
                    }
                    Err(e) => return Err(e),
                }
            }
            let title = format!("All Blocks Summary Report - {period}");
            (title, structure::block_summary_table(&rows, period), None, None)
        }
        ReportKind::ExpenseDetail => {
            let bundle = ctx
                .store
                .find_cache_bundle(&BundleFilter { period, block: block.clone() })?
                .ok_or_else(|| {
                    let b = block.as_ref().map_or_else(|| "any".to_string(), |b| b.to_string());
                    ReportError::NotFound(format!("no expense detail for period {period}, block {b}"))
                })?;
            let title = format!("{period} Period {} Block Expense Detail Report", bundle.block);
            let notes = ctx.store.list_announcements()?;
            (
                title,
                structure::expense_detail_table(&bundle),
                Some(structure::announcements_table(&notes)),
                Some(bundle.block),
            )
        }
    };

    let content = render_csv::render(&table, announcements.as_ref())?;
    info!(kind = %req.kind, %period, rows = table.rows.len(), "report exported");
    Ok(ExportOutput {
        kind: req.kind,
        period,
        block,
        title,
        row_count: table.rows.len(),
        content,
        generated_at: ctx.clock.now(),
    })
}

fn cached_or_computed(ctx: EngineCtx<'_>, block: &BlockLetter, period: Period) -> ReportResult<CacheBundle> {
    let hit = ctx.store.find_cache_bundle(&BundleFilter { period, block: Some(block.clone()) })?;
    match hit {
        Some(b) => Ok(b),
        None => Ok(compute_and_cache(ctx, block, period)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_parse_current_and_legacy_tokens() {
        assert_eq!("unit-detail".parse::<ReportKind>().unwrap(), ReportKind::UnitDetail);
        assert_eq!("blok_ozeti".parse::<ReportKind>().unwrap(), ReportKind::BlockSummary);
        assert_eq!("gider_detay".parse::<ReportKind>().unwrap(), ReportKind::ExpenseDetail);
        assert!(matches!("excel".parse::<ReportKind>(), Err(ReportError::Validation(_))));
    }

    #[test]
    fn request_accepts_legacy_body() {
        let r: ExportRequest =
            serde_json::from_str(r#"{"raporTuru":"gider_detay","period":"2024-01","blokHarfi":"A"}"#).unwrap();
        assert_eq!(r.kind, ReportKind::ExpenseDetail);
        assert_eq!(r.block.as_deref(), Some("A"));
    }
}
