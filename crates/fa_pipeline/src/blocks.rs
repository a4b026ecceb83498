//! Block metadata listing with complex-wide statistics.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use fa_core::entities::BlockDescriptor;
use fa_core::money::round_to;
use fa_core::BlockLetter;
use fa_io::Store;

use crate::{PipelineError, PipelineResult};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneStatistics {
    pub block_count: u32,
    pub blocks: Vec<BlockLetter>,
    pub unit_count: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplexStatistics {
    pub block_count: u32,
    pub total_units: u32,
    pub total_elevator_users: u32,
    /// Units not using the elevator.
    pub ground_floor_units: u32,
    /// Σ declared area × declared unit count.
    pub total_area: Decimal,
    /// Whole square units.
    pub average_unit_area: Decimal,
    /// Keyed by heating zone number.
    pub zones: BTreeMap<u8, ZoneStatistics>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockListing {
    pub blocks: Vec<BlockDescriptor>,
    pub statistics: ComplexStatistics,
}

impl ComplexStatistics {
    pub fn from_blocks(blocks: &[BlockDescriptor]) -> Self {
        let total_units: u32 = blocks.iter().map(|b| b.unit_count).sum();
        let total_elevator_users: u32 = blocks.iter().map(|b| b.elevator_users).sum();
        let total_area = blocks
            .iter()
            .map(|b| b.area.saturating_mul(Decimal::from(b.unit_count)))
            .fold(Decimal::ZERO, Decimal::saturating_add);
        let average_unit_area = if total_units == 0 {
            Decimal::ZERO
        } else {
            round_to(total_area / Decimal::from(total_units), 0)
        };

        let mut zones: BTreeMap<u8, ZoneStatistics> = BTreeMap::new();
        for b in blocks {
            let z = zones.entry(b.heating_zone.number()).or_default();
            z.block_count += 1;
            z.blocks.push(b.block.clone());
            z.unit_count += b.unit_count;
        }

        Self {
            block_count: blocks.len() as u32,
            total_units,
            total_elevator_users,
            ground_floor_units: total_units.saturating_sub(total_elevator_users),
            total_area,
            average_unit_area,
            zones,
        }
    }
}

/// Descriptors ordered by block number, plus statistics.
pub fn list_blocks(store: &dyn Store) -> PipelineResult<BlockListing> {
    let blocks = store.list_block_metadata()?;
    if blocks.is_empty() {
        return Err(PipelineError::NotFound("complex structure not found".into()));
    }
    let statistics = ComplexStatistics::from_blocks(&blocks);
    Ok(BlockListing { blocks, statistics })
}
