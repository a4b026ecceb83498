//! Lazily initialised store handle.
//!
//! The handle is created by the binary (or a test) and passed down; the
//! store itself is opened on first use and shared for the handle's lifetime.

use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;
use tracing::debug;

use crate::store::Store;
use crate::{IoError, IoResult};

type Init = Box<dyn Fn() -> IoResult<Arc<dyn Store>> + Send + Sync>;

pub struct StoreHandle {
    cell: OnceLock<Arc<dyn Store>>,
    init: Init,
    init_lock: Mutex<()>,
}

impl StoreHandle {
    /// Open the store on first `get()`. A failed open is retried on the next call.
    pub fn lazy<F>(init: F) -> Self
    where
        F: Fn() -> IoResult<Arc<dyn Store>> + Send + Sync + 'static,
    {
        Self { cell: OnceLock::new(), init: Box::new(init), init_lock: Mutex::new(()) }
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }

    pub fn get(&self) -> IoResult<&dyn Store> {
        if let Some(s) = self.cell.get() {
            return Ok(s.as_ref());
        }
        let _g = self.init_lock.lock();
        if self.cell.get().is_none() {
            debug!("opening store");
            let _ = self.cell.set((self.init)()?);
        }
        self.cell
            .get()
            .map(|s| s.as_ref())
            .ok_or_else(|| IoError::Store("store handle not initialized".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn initializer_runs_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let c = calls.clone();
        let h = StoreHandle::lazy(move || {
            c.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(MemoryStore::new()) as Arc<dyn Store>)
        });
        assert!(!h.is_initialized());
        h.get().unwrap();
        h.get().unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(h.is_initialized());
    }

    #[test]
    fn failed_open_surfaces_and_retries() {
        let calls = Arc::new(AtomicUsize::new(0));
        let c = calls.clone();
        let h = StoreHandle::lazy(move || {
            c.fetch_add(1, Ordering::SeqCst);
            Err(IoError::NotFound("data directory".into()))
        });
        assert!(matches!(h.get(), Err(IoError::NotFound(_))));
        assert!(h.get().is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
