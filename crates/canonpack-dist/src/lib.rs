//! Distribution pack building for canonpack datasets.
//!
//! A release is a deterministic payload (the whole dataset as one canonical
//! byte sequence), a manifest describing that payload, and a detached
//! Ed25519 signature over the exact manifest bytes. Build, sign, and verify
//! are sequential pipeline stages with explicit handoff; nothing here
//! retries, and a failed integrity check stops the pipeline.

#![deny(missing_docs)]

/// Build pipeline and the injected dataset-validator capability.
pub mod build;
/// Dataset root loading.
pub mod dataset;
/// Error types for pack operations.
pub mod errors;
/// Pack manifest: the signing target.
pub mod manifest;
/// Deterministic payload assembly.
pub mod payload;
/// Ed25519 signing over manifest bytes.
pub mod sign;
/// Payload integrity and signature verification.
pub mod verify;

pub use build::{build, BuildOptions, BuildResult, CanonValidator, CommandValidator, ValidatorOutcome};
pub use dataset::{CanonDataset, CanonSchema, IdentityContract};
pub use errors::DistError;
pub use manifest::{
    build_manifest, serialize_manifest, PackKind, PackManifest, PayloadFile, PayloadSection,
    MANIFEST_FILE, PACK_FORMAT_VERSION, PAYLOAD_PATH, SIGNATURE_PATH,
};
pub use payload::{build_payload, hash_payload};
pub use sign::{
    load_signing_key, load_verifying_key, sign_manifest_bytes, verify_manifest_signature, SignError,
};
pub use verify::{verify_pack, VerifyError, VerifyMode, VerifyReport};
