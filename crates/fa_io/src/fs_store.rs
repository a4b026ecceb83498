//! JSON data-directory store.
//!
//! Layout under the root directory (every file optional except the root):
//!
//! ```text
//! units.json          [Unit]
//! expenses.json       [ExpenseSnapshot]
//! blocks.json         [BlockDescriptor]
//! announcements.json  [Announcement]
//! registrations.json  [{id, ..Registration}]
//! cache/<key>.json    CacheBundle, canonical JSON, written atomically
//! ```
//!
//! Bundle files are replaced by temp-file + rename, so a reader sees either
//! the previous bundle or the new one.

use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use fa_core::computed::{CacheBundle, CacheKey};
use fa_core::determinism::sort_canonical;
use fa_core::entities::{Announcement, BlockDescriptor, ExpenseSnapshot, Registration, Unit};
use fa_core::Period;

use crate::canonical_json::write_canonical_file;
use crate::store::{registration_id, BundleFilter, Store, UnitFilter};
use crate::{IoError, IoResult};

pub const UNITS_FILE: &str = "units.json";
pub const EXPENSES_FILE: &str = "expenses.json";
pub const BLOCKS_FILE: &str = "blocks.json";
pub const ANNOUNCEMENTS_FILE: &str = "announcements.json";
pub const REGISTRATIONS_FILE: &str = "registrations.json";
pub const CACHE_DIR: &str = "cache";

#[derive(Serialize, Deserialize)]
struct StoredRegistration {
    id: String,
    #[serde(flatten)]
    record: Registration,
}

pub struct FsStore {
    root: PathBuf,
    /// Serialises read-modify-write of the registrations file.
    registrations: Mutex<()>,
}

impl FsStore {
    /// Open an existing data directory.
    pub fn open(root: impl Into<PathBuf>) -> IoResult<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(IoError::NotFound(format!("data directory {}", root.display())));
        }
        debug!(root = %root.display(), "fs store opened");
        Ok(Self { root, registrations: Mutex::new(()) })
    }

    fn cache_path(&self, key: &str) -> PathBuf {
        self.root.join(CACHE_DIR).join(format!("{key}.json"))
    }

    fn read_list<T: DeserializeOwned>(&self, name: &str) -> IoResult<Vec<T>> {
        Ok(read_json(&self.root.join(name))?.unwrap_or_default())
    }
}

/// Parse a JSON file; `None` when it does not exist.
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> IoResult<Option<T>> {
    let text = match fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    serde_json::from_str(&text).map(Some).map_err(|e| IoError::Json {
        pointer: format!("{}:{}:{}", path.display(), e.line(), e.column()),
        msg: e.to_string(),
    })
}

impl Store for FsStore {
    fn find_expense_snapshot(&self, period: Period) -> IoResult<Option<ExpenseSnapshot>> {
        let all: Vec<ExpenseSnapshot> = self.read_list(EXPENSES_FILE)?;
        Ok(all.into_iter().find(|s| s.period == period))
    }

    fn list_active_units(&self, filter: &UnitFilter) -> IoResult<Vec<Unit>> {
        let mut units: Vec<Unit> = self.read_list(UNITS_FILE)?;
        units.retain(|u| filter.matches(u));
        sort_canonical(&mut units);
        Ok(units)
    }

    fn list_block_metadata(&self) -> IoResult<Vec<BlockDescriptor>> {
        let mut blocks: Vec<BlockDescriptor> = self.read_list(BLOCKS_FILE)?;
        sort_canonical(&mut blocks);
        Ok(blocks)
    }

    fn upsert_cache_bundle(&self, key: &CacheKey, bundle: &CacheBundle) -> IoResult<()> {
        let path = self.cache_path(&key.to_string());
        write_canonical_file(&path, bundle)?;
        info!(key = %key, path = %path.display(), "cache bundle written");
        Ok(())
    }

    fn find_cache_bundle(&self, filter: &BundleFilter) -> IoResult<Option<CacheBundle>> {
        if let Some(block) = &filter.block {
            let key = CacheKey::unit_detail(block.clone(), filter.period);
            return read_json(&self.cache_path(&key.to_string()));
        }
        let dir = self.root.join(CACHE_DIR);
        let mut paths: Vec<PathBuf> = match fs::read_dir(&dir) {
            Ok(rd) => rd
                .filter_map(|e| e.ok().map(|e| e.path()))
                .filter(|p| p.extension().and_then(|x| x.to_str()) == Some("json"))
                .collect(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        paths.sort();
        for p in paths {
            if let Some(b) = read_json::<CacheBundle>(&p)? {
                if filter.matches(&b) {
                    return Ok(Some(b));
                }
            }
        }
        Ok(None)
    }

    fn list_announcements(&self) -> IoResult<Vec<Announcement>> {
        self.read_list(ANNOUNCEMENTS_FILE)
    }

    fn insert_registration(&self, record: &Registration) -> IoResult<String> {
        let _guard = self.registrations.lock();
        let path = self.root.join(REGISTRATIONS_FILE);
        let mut all: Vec<StoredRegistration> = read_json(&path)?.unwrap_or_default();
        let id = registration_id(all.len() + 1);
        all.push(StoredRegistration { id: id.clone(), record: record.clone() });
        write_canonical_file(&path, &all)?;
        Ok(id)
    }
}
