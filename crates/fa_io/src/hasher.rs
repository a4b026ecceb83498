//! SHA-256 digests over canonical bytes.
//!
//! Hex digests are lowercase. A bundle digest covers everything except the
//! computation timestamp and the digest field itself, so identical inputs
//! produce identical digests across runs.

use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};

use fa_core::computed::CacheBundle;

use crate::canonical_json::to_canonical_bytes;
use crate::IoResult;

/// SHA-256 over raw bytes.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// SHA-256 over canonical JSON bytes of any serializable value.
pub fn sha256_canonical<T: Serialize>(value: &T) -> IoResult<String> {
    Ok(sha256_hex(&to_canonical_bytes(value)?))
}

/// Content digest of a bundle (timestamp and digest excluded).
pub fn bundle_digest(bundle: &CacheBundle) -> IoResult<String> {
    let mut v = serde_json::to_value(bundle)?;
    if let Value::Object(map) = &mut v {
        map.remove("computed_at");
        map.remove("digest");
    }
    sha256_canonical(&v)
}
