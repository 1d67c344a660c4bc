//! Pack verification.
//!
//! Integrity first: every payload file named by the manifest is re-read from
//! disk and its hash and byte length compared against the recorded values.
//! Authenticity second: when a public key is supplied, the detached
//! signature is checked over the exact manifest bytes. The two failure
//! classes are reported separately: a valid signature over a corrupted
//! payload is still a broken release, and a matching hash under a bad
//! signature must not be trusted.
//!
//! Verification with no public key is the explicit hash-only mode, not a
//! silent degrade. All violations are collected, not fail-fast.

use std::fs;
use std::path::{Path, PathBuf};

use ed25519_dalek::VerifyingKey;
use thiserror::Error;

use crate::manifest::{PackManifest, MANIFEST_FILE, SIGNATURE_PATH};
use crate::payload::hash_payload;
use crate::sign::verify_manifest_signature;

/// How a verification run was performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyMode {
    /// Payload-hash integrity checking only; no key was supplied.
    HashOnly,
    /// Integrity checking plus signature verification.
    Signed,
}

/// A single verification failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyError {
    /// The manifest file is missing.
    #[error("manifest not found at {}", path.display())]
    MissingManifest {
        /// Expected manifest location.
        path: PathBuf,
    },
    /// The manifest file does not parse.
    #[error("manifest is not valid JSON: {reason}")]
    ManifestParse {
        /// Parse failure description.
        reason: String,
    },
    /// A payload file named by the manifest is missing.
    #[error("payload file missing: {path}")]
    MissingPayload {
        /// Pack-relative payload path.
        path: String,
    },
    /// A payload file's recomputed hash differs from the manifest.
    #[error("payload hash mismatch for {path}: manifest {expected}, computed {actual}")]
    HashMismatch {
        /// Pack-relative payload path.
        path: String,
        /// Hash recorded in the manifest.
        expected: String,
        /// Hash recomputed from disk.
        actual: String,
    },
    /// A payload file's byte length differs from the manifest.
    #[error("payload size mismatch for {path}: manifest {expected} bytes, found {actual}")]
    SizeMismatch {
        /// Pack-relative payload path.
        path: String,
        /// Length recorded in the manifest.
        expected: u64,
        /// Length found on disk.
        actual: u64,
    },
    /// A public key was supplied but the signature file is missing.
    #[error("signature not found at {}", path.display())]
    MissingSignature {
        /// Expected signature location.
        path: PathBuf,
    },
    /// The signature does not verify over the manifest bytes.
    #[error("signature verification failed")]
    SignatureInvalid,
}

impl VerifyError {
    /// Whether this failure is an authenticity failure (as opposed to an
    /// integrity failure).
    pub fn is_authenticity_failure(&self) -> bool {
        matches!(
            self,
            VerifyError::MissingSignature { .. } | VerifyError::SignatureInvalid
        )
    }
}

/// Outcome of a verification run: the mode it ran in and every violation
/// found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyReport {
    /// Mode the run was performed in.
    pub mode: VerifyMode,
    /// All violations, in discovery order.
    pub errors: Vec<VerifyError>,
}

impl VerifyReport {
    /// Whether the pack verified cleanly.
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Verifies a pack on disk.
///
/// With `public_key` set, the detached signature at `signature/manifest.sig`
/// is additionally checked over the exact manifest bytes.
pub fn verify_pack(pack_root: &Path, public_key: Option<&VerifyingKey>) -> VerifyReport {
    let mode = match public_key {
        Some(_) => VerifyMode::Signed,
        None => VerifyMode::HashOnly,
    };
    let mut errors = Vec::new();

    let manifest_path = pack_root.join(MANIFEST_FILE);
    let manifest_bytes = match fs::read(&manifest_path) {
        Ok(bytes) => bytes,
        Err(_) => {
            errors.push(VerifyError::MissingManifest {
                path: manifest_path,
            });
            return VerifyReport { mode, errors };
        }
    };

    let manifest: PackManifest = match serde_json::from_slice(&manifest_bytes) {
        Ok(manifest) => manifest,
        Err(err) => {
            errors.push(VerifyError::ManifestParse {
                reason: err.to_string(),
            });
            return VerifyReport { mode, errors };
        }
    };

    for file in &manifest.payload.files {
        let on_disk = match fs::read(pack_root.join(&file.path)) {
            Ok(bytes) => bytes,
            Err(_) => {
                errors.push(VerifyError::MissingPayload {
                    path: file.path.clone(),
                });
                continue;
            }
        };
        let actual = hash_payload(&on_disk);
        if actual != file.sha256 {
            errors.push(VerifyError::HashMismatch {
                path: file.path.clone(),
                expected: file.sha256.clone(),
                actual,
            });
        }
        if on_disk.len() as u64 != file.bytes {
            errors.push(VerifyError::SizeMismatch {
                path: file.path.clone(),
                expected: file.bytes,
                actual: on_disk.len() as u64,
            });
        }
    }

    if let Some(key) = public_key {
        let signature_path = pack_root.join(SIGNATURE_PATH);
        match fs::read(&signature_path) {
            Ok(signature) => {
                if !verify_manifest_signature(&manifest_bytes, &signature, key) {
                    errors.push(VerifyError::SignatureInvalid);
                }
            }
            Err(_) => errors.push(VerifyError::MissingSignature {
                path: signature_path,
            }),
        }
    }

    VerifyReport { mode, errors }
}
