use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::canonical::canonical_bytes;

/// Hashes raw bytes with sha-256 and returns lowercase hex.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Hashes the canonical encoding of a JSON value.
///
/// Equivalent to `sha256_hex(canonical_bytes(value))`; every identity and
/// payload hash in the system reduces to this.
pub fn hash_value(value: &Value) -> String {
    sha256_hex(&canonical_bytes(value))
}
