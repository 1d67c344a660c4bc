//! Canonicalization and identity primitives for canonpack datasets.
//!
//! Everything that participates in hashing lives in this crate: the
//! deterministic serializer, the sha-256 digest helpers, the frozen scalar
//! normalizers, and the versioned edition identity string.
//!
#![deny(missing_docs)]

/// Deterministic JSON encoding used for every hash in the system.
pub mod canonical;
/// Digest helpers over canonical bytes.
pub mod digest;
/// Identity-scheme generations and the edition identity string.
pub mod identity;
/// Frozen scalar normalizers for identity-significant fields.
pub mod normalize;
/// Validation helpers used by canonical types.
pub mod validation;

pub use canonical::{canonical_bytes, canonical_string};
pub use digest::{hash_value, sha256_hex};
pub use identity::{Generation, IdentityString};
pub use normalize::{normalize_product_code, normalize_tag};
pub use validation::ValidationError;
