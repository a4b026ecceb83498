//! Loader: engine configuration and roster/snapshot validation.
//!
//! `config.json` is optional; absent fields take their defaults. Rosters and
//! snapshots are checked against the domain invariants before any
//! computation uses them.

use std::path::Path;

use tracing::debug;

use fa_core::entities::{ExpenseSnapshot, Unit};
use fa_core::variables::EngineConfig;

use crate::fs_store::read_json;
use crate::{IoError, IoResult};

pub const CONFIG_FILE: &str = "config.json";

/// Load `<dir>/config.json`, or the defaults when the file is absent.
pub fn load_config(dir: &Path) -> IoResult<EngineConfig> {
    let cfg: EngineConfig = match read_json(&dir.join(CONFIG_FILE))? {
        Some(c) => c,
        None => {
            debug!(dir = %dir.display(), "no config.json; using defaults");
            EngineConfig::default()
        }
    };
    cfg.validate()?;
    Ok(cfg)
}

/// Every unit must satisfy its invariants under `cfg`; global ids are unique.
pub fn check_roster(units: &[Unit], cfg: &EngineConfig) -> IoResult<()> {
    let mut seen = std::collections::BTreeSet::new();
    for u in units {
        u.validate(&cfg.heating_zones)
            .map_err(|e| IoError::Invalid(format!("unit {} (block {}): {e}", u.global_id, u.block)))?;
        if !seen.insert(u.global_id.as_str()) {
            return Err(IoError::Invalid(format!("duplicate unit id {}", u.global_id)));
        }
    }
    Ok(())
}

pub fn check_snapshot(snapshot: &ExpenseSnapshot) -> IoResult<()> {
    snapshot
        .validate()
        .map_err(|e| IoError::Invalid(format!("period {}: {e}", snapshot.period)))
}
