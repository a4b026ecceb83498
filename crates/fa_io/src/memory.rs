//! In-process store over `parking_lot::RwLock`.
//!
//! Holds whole documents; a bundle upsert swaps the map entry under the write
//! lock, so readers see either the old or the new bundle, never a mix.

use std::collections::BTreeMap;

use parking_lot::RwLock;
use tracing::debug;

use fa_core::computed::{CacheBundle, CacheKey};
use fa_core::determinism::sort_canonical;
use fa_core::entities::{Announcement, BlockDescriptor, ExpenseSnapshot, Registration, Unit};
use fa_core::Period;

use crate::store::{registration_id, BundleFilter, Store, UnitFilter};
use crate::IoResult;

#[derive(Default)]
struct Inner {
    units: Vec<Unit>,
    snapshots: BTreeMap<Period, ExpenseSnapshot>,
    blocks: Vec<BlockDescriptor>,
    announcements: Vec<Announcement>,
    bundles: BTreeMap<String, CacheBundle>,
    registrations: Vec<(String, Registration)>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_units(self, units: Vec<Unit>) -> Self {
        self.inner.write().units = units;
        self
    }

    pub fn with_snapshot(self, snapshot: ExpenseSnapshot) -> Self {
        self.put_snapshot(snapshot);
        self
    }

    pub fn with_blocks(self, blocks: Vec<BlockDescriptor>) -> Self {
        self.inner.write().blocks = blocks;
        self
    }

    pub fn with_announcements(self, announcements: Vec<Announcement>) -> Self {
        self.inner.write().announcements = announcements;
        self
    }

    /// Replace the snapshot for its period.
    pub fn put_snapshot(&self, snapshot: ExpenseSnapshot) {
        self.inner.write().snapshots.insert(snapshot.period, snapshot);
    }

    pub fn bundle_count(&self) -> usize {
        self.inner.read().bundles.len()
    }

    pub fn registrations(&self) -> Vec<(String, Registration)> {
        self.inner.read().registrations.clone()
    }
}

impl Store for MemoryStore {
    fn find_expense_snapshot(&self, period: Period) -> IoResult<Option<ExpenseSnapshot>> {
        Ok(self.inner.read().snapshots.get(&period).cloned())
    }

    fn list_active_units(&self, filter: &UnitFilter) -> IoResult<Vec<Unit>> {
        let mut out: Vec<Unit> = self.inner.read().units.iter().filter(|u| filter.matches(u)).cloned().collect();
        sort_canonical(&mut out);
        Ok(out)
    }

    fn list_block_metadata(&self) -> IoResult<Vec<BlockDescriptor>> {
        let mut out = self.inner.read().blocks.clone();
        sort_canonical(&mut out);
        Ok(out)
    }

    fn upsert_cache_bundle(&self, key: &CacheKey, bundle: &CacheBundle) -> IoResult<()> {
        let k = key.to_string();
        debug!(key = %k, "memory store: upsert bundle");
        self.inner.write().bundles.insert(k, bundle.clone());
        Ok(())
    }

    fn find_cache_bundle(&self, filter: &BundleFilter) -> IoResult<Option<CacheBundle>> {
        Ok(self.inner.read().bundles.values().find(|b| filter.matches(b)).cloned())
    }

    fn list_announcements(&self) -> IoResult<Vec<Announcement>> {
        Ok(self.inner.read().announcements.clone())
    }

    fn insert_registration(&self, record: &Registration) -> IoResult<String> {
        let mut g = self.inner.write();
        let id = registration_id(g.registrations.len() + 1);
        g.registrations.push((id.clone(), record.clone()));
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fa_core::entities::HeatingZone;
    use fa_core::Decimal;

    fn unit(block: &str, floor: i32, no: u32, active: bool) -> Unit {
        Unit {
            global_id: format!("{block}-{no}"),
            block: block.parse().unwrap(),
            floor,
            floor_label: String::new(),
            unit_number: no,
            display_name: String::new(),
            unit_type: String::new(),
            area: Decimal::from(100),
            uses_elevator: false,
            heating_zone: HeatingZone::One,
            heating_capacity: Decimal::ZERO,
            active,
        }
    }

    #[test]
    fn active_units_are_filtered_and_ordered() {
        let s = MemoryStore::new().with_units(vec![
            unit("A", 2, 201, true),
            unit("B", 0, 1, true),
            unit("A", 0, 2, true),
            unit("A", 0, 1, false),
        ]);
        let a = s.list_active_units(&UnitFilter::block("A".parse().unwrap())).unwrap();
        let ids: Vec<&str> = a.iter().map(|u| u.global_id.as_str()).collect();
        assert_eq!(ids, vec!["A-2", "A-201"]);
        assert_eq!(s.list_all_active_units().unwrap().len(), 3);

        let one = s
            .list_active_units(&UnitFilter { block: None, unit_number: Some(201) })
            .unwrap();
        assert_eq!(one.len(), 1);
    }

    #[test]
    fn registrations_get_sequential_ids() {
        let s = MemoryStore::new();
        let r = Registration {
            phone: "5321234567".into(),
            apartment_number: "12".into(),
            building: "A".into(),
            registration_source: "cli".into(),
            client_address: None,
            user_agent: "Unknown".into(),
            registered_at: chrono::Utc::now(),
        };
        assert_eq!(s.insert_registration(&r).unwrap(), "REG-000001");
        assert_eq!(s.insert_registration(&r).unwrap(), "REG-000002");
        assert_eq!(s.registrations().len(), 2);
    }
}
