//! Data-availability check: is there a cached bundle with detail rows?

use serde::{Deserialize, Serialize};
use tracing::debug;

use fa_core::{BlockLetter, CoreError, Period};
use fa_io::{BundleFilter, Store};

use crate::{PipelineError, PipelineResult};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckRequest {
    #[serde(default)]
    pub period: Option<String>,
    #[serde(alias = "blockLetter", alias = "blokHarfi", default)]
    pub block: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    pub has_data: bool,
    pub record_found: bool,
    pub row_count: usize,
}

pub fn check_data(store: &dyn Store, req: &CheckRequest) -> PipelineResult<CheckResult> {
    let period: Period = match req.period.as_deref().map(str::trim) {
        Some(p) if !p.is_empty() => p.parse().map_err(|e: CoreError| PipelineError::Validation(e.to_string()))?,
        _ => return Err(PipelineError::Validation("period is required".into())),
    };
    let block: Option<BlockLetter> = match req.block.as_deref().map(str::trim) {
        Some(b) if !b.is_empty() => Some(b.parse().map_err(|e: CoreError| PipelineError::Validation(e.to_string()))?),
        _ => None,
    };

    let found = store.find_cache_bundle(&BundleFilter { period, block })?;
    let row_count = found.as_ref().map_or(0, |b| b.expense_rows.len());
    let res = CheckResult { has_data: row_count > 0, record_found: found.is_some(), row_count };
    debug!(%period, ?res, "data check");
    Ok(res)
}
