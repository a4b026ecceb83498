//! crates/fa_io/src/lib.rs
//! Collaborator boundary of the fee-allocation engine.
//!
//! - `Store`: the consumed store operations (roster, expenses, block metadata,
//!   cache bundles, announcements, registrations).
//! - `MemoryStore` / `FsStore`: in-process and JSON-directory implementations.
//! - `StoreHandle`: lazily initialised, injected handle (no ambient globals).
//! - Canonical JSON + SHA-256 for bundle digests; atomic file writes.

#![forbid(unsafe_code)]

use thiserror::Error;

/// Unified error for fa_io.
#[derive(Debug, Error)]
pub enum IoError {
    /// Data directory or document absent.
    #[error("not found: {0}")]
    NotFound(String),

    /// Filesystem errors (create_dir_all, rename, fsync, ...).
    #[error("io error: {0}")]
    Io(String),

    /// JSON (de)serialization errors with a pointer-like hint.
    #[error("json error at {pointer}: {msg}")]
    Json { pointer: String, msg: String },

    /// Loaded data violates a domain invariant.
    #[error("invalid: {0}")]
    Invalid(String),

    /// The store refused or failed an operation.
    #[error("store error: {0}")]
    Store(String),
}

pub type IoResult<T> = Result<T, IoError>;

/* ---------------- From conversions (used by file modules) ---------------- */

impl From<std::io::Error> for IoError {
    fn from(e: std::io::Error) -> Self {
        IoError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for IoError {
    fn from(e: serde_json::Error) -> Self {
        // serde_json keeps no pointer; report line/column instead.
        IoError::Json {
            pointer: format!("line {} column {}", e.line(), e.column()),
            msg: e.to_string(),
        }
    }
}

impl From<fa_core::CoreError> for IoError {
    fn from(e: fa_core::CoreError) -> Self {
        IoError::Invalid(e.to_string())
    }
}

pub mod canonical_json;
pub mod fs_store;
pub mod handle;
pub mod hasher;
pub mod loader;
pub mod memory;
pub mod store;

pub use fs_store::FsStore;
pub use handle::StoreHandle;
pub use memory::MemoryStore;
pub use store::{BundleFilter, Store, UnitFilter};

pub mod prelude {
    pub use crate::{BundleFilter, IoError, IoResult, Store, StoreHandle, UnitFilter};
    pub use crate::canonical_json::to_canonical_bytes;
    pub use crate::hasher::{bundle_digest, sha256_hex};
}
