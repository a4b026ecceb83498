//! Determinism utilities: stable roster/block ordering.
//!
//! Roster order is `(floor ↑, unit_number ↑)`, the order the store is asked
//! for and the order every report is emitted in. Sorting again after load
//! keeps results identical even if a collaborator ignores the requested order.

use core::cmp::Ordering;

use crate::entities::{BlockDescriptor, Unit};

/// Provide a **total**, stable order for values that must sort canonically.
pub trait StableOrd {
    fn stable_cmp(&self, other: &Self) -> Ordering;
}

impl StableOrd for Unit {
    /// `(floor, unit_number, global_id)`; the id only breaks malformed duplicates.
    #[inline]
    fn stable_cmp(&self, other: &Self) -> Ordering {
        self.floor
            .cmp(&other.floor)
            .then_with(|| self.unit_number.cmp(&other.unit_number))
            .then_with(|| self.global_id.cmp(&other.global_id))
    }
}

impl StableOrd for BlockDescriptor {
    #[inline]
    fn stable_cmp(&self, other: &Self) -> Ordering {
        self.block_no
            .cmp(&other.block_no)
            .then_with(|| self.block.cmp(&other.block))
    }
}

/// Sort in place into canonical order.
#[inline]
pub fn sort_canonical<T: StableOrd>(xs: &mut [T]) {
    xs.sort_by(|a, b| a.stable_cmp(b));
}
