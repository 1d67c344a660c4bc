//! Ed25519 signing over manifest bytes.
//!
//! The signature covers the exact UTF-8 bytes of `manifest.json` as written
//! to disk, nothing derived. Keys are raw 32-byte files; key-pair generation
//! tooling lives outside this crate.

use std::fs;
use std::path::{Path, PathBuf};

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use thiserror::Error;

/// Errors from key loading and signature handling.
#[derive(Debug, Error)]
pub enum SignError {
    /// I/O error reading a key or signature file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// A key file did not hold exactly 32 bytes.
    #[error("key file {} must hold exactly 32 bytes, found {found}", path.display())]
    InvalidKeyLength {
        /// Offending file.
        path: PathBuf,
        /// Actual byte count.
        found: usize,
    },
    /// The public key bytes do not describe a valid Ed25519 point.
    #[error("invalid public key in {}", path.display())]
    InvalidPublicKey {
        /// Offending file.
        path: PathBuf,
    },
}

/// Loads a raw 32-byte Ed25519 signing key.
pub fn load_signing_key(path: &Path) -> Result<SigningKey, SignError> {
    Ok(SigningKey::from_bytes(&read_key_bytes(path)?))
}

/// Loads a raw 32-byte Ed25519 verifying key.
pub fn load_verifying_key(path: &Path) -> Result<VerifyingKey, SignError> {
    let bytes = read_key_bytes(path)?;
    VerifyingKey::from_bytes(&bytes).map_err(|_| SignError::InvalidPublicKey {
        path: path.to_path_buf(),
    })
}

fn read_key_bytes(path: &Path) -> Result<[u8; 32], SignError> {
    let bytes = fs::read(path)?;
    bytes
        .as_slice()
        .try_into()
        .map_err(|_| SignError::InvalidKeyLength {
            path: path.to_path_buf(),
            found: bytes.len(),
        })
}

/// Signs manifest bytes, returning the raw 64-byte detached signature.
pub fn sign_manifest_bytes(manifest_bytes: &[u8], key: &SigningKey) -> Vec<u8> {
    key.sign(manifest_bytes).to_bytes().to_vec()
}

/// Verifies a detached signature over manifest bytes.
pub fn verify_manifest_signature(
    manifest_bytes: &[u8],
    signature_bytes: &[u8],
    key: &VerifyingKey,
) -> bool {
    match Signature::from_slice(signature_bytes) {
        Ok(signature) => key.verify(manifest_bytes, &signature).is_ok(),
        Err(_) => false,
    }
}
