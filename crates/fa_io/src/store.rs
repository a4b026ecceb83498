//! The store collaborator: every read/write the engine performs.
//!
//! Implementations must return active units ordered `(floor ↑, unit_number ↑)`
//! and must replace a cache bundle under its key as one observable step.
//! Calls are synchronous; any timeout policy belongs to the implementation.

use fa_core::computed::{CacheBundle, CacheKey};
use fa_core::entities::{Announcement, BlockDescriptor, ExpenseSnapshot, Registration, Unit};
use fa_core::{BlockLetter, Period};

use crate::IoResult;

/// Roster filter for `list_active_units`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UnitFilter {
    pub block: Option<BlockLetter>,
    pub unit_number: Option<u32>,
}

impl UnitFilter {
    pub fn block(block: BlockLetter) -> Self {
        Self { block: Some(block), unit_number: None }
    }

    pub fn matches(&self, u: &Unit) -> bool {
        u.active
            && self.block.as_ref().map_or(true, |b| &u.block == b)
            && self.unit_number.map_or(true, |n| u.unit_number == n)
    }
}

/// Lookup for cached unit-detail bundles. Without a block, the first bundle
/// of the period in key order is returned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BundleFilter {
    pub period: Period,
    pub block: Option<BlockLetter>,
}

impl BundleFilter {
    pub fn matches(&self, b: &CacheBundle) -> bool {
        b.period == self.period && self.block.as_ref().map_or(true, |x| &b.block == x)
    }
}

pub trait Store: Send + Sync {
    fn find_expense_snapshot(&self, period: Period) -> IoResult<Option<ExpenseSnapshot>>;

    fn list_active_units(&self, filter: &UnitFilter) -> IoResult<Vec<Unit>>;

    /// Complex-wide active roster (ratio denominators).
    fn list_all_active_units(&self) -> IoResult<Vec<Unit>> {
        self.list_active_units(&UnitFilter::default())
    }

    fn list_block_metadata(&self) -> IoResult<Vec<BlockDescriptor>>;

    /// Last-write-wins replace under `key`.
    fn upsert_cache_bundle(&self, key: &CacheKey, bundle: &CacheBundle) -> IoResult<()>;

    fn find_cache_bundle(&self, filter: &BundleFilter) -> IoResult<Option<CacheBundle>>;

    fn list_announcements(&self) -> IoResult<Vec<Announcement>>;

    /// Persist a registration; returns the store-assigned id.
    fn insert_registration(&self, record: &Registration) -> IoResult<String>;
}

/// Id format shared by the bundled stores.
pub(crate) fn registration_id(seq: usize) -> String {
    format!("REG-{seq:06}")
}
