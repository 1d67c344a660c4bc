//! Pack manifest: the signing target.
//!
//! The manifest describes exactly one logical release. Its serialized form
//! goes through the canonical serializer so the same manifest always yields
//! the same signing bytes; `created_at` is informational and never affects
//! the payload hash.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use canonpack_canonical::canonical_string;

use crate::payload::hash_payload;

/// Current pack format version.
pub const PACK_FORMAT_VERSION: &str = "1";

/// Path of the payload file inside a pack, relative to the pack root.
pub const PAYLOAD_PATH: &str = "payload/data.json";

/// Path of the manifest file inside a pack.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Path of the detached signature inside a pack.
pub const SIGNATURE_PATH: &str = "signature/manifest.sig";

/// Pack kind. Only full packs are built by this pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackKind {
    /// Complete dataset snapshot.
    Full,
    /// Delta against a prior release (reserved; never built here).
    Incremental,
}

/// One payload file entry: path, content hash, byte length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadFile {
    /// Pack-relative path.
    pub path: String,
    /// sha-256 of the file bytes, lowercase hex.
    pub sha256: String,
    /// Byte length of the file.
    pub bytes: u64,
}

/// Payload section of the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadSection {
    /// Payload files, sorted by path.
    pub files: Vec<PayloadFile>,
}

/// Manifest describing one payload release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackManifest {
    /// Pack format version, currently [`PACK_FORMAT_VERSION`].
    pub pack_format_version: String,
    /// Opaque dataset version label.
    pub canon_version: String,
    /// Dataset schema version.
    pub schema_version: String,
    /// Identity-scheme version tag, e.g. `v4`.
    pub identity_version: String,
    /// Pack kind.
    #[serde(rename = "type")]
    pub kind: PackKind,
    /// Creation timestamp, RFC 3339. Informational only: it never affects
    /// the payload hash and differs between otherwise identical builds.
    pub created_at: String,
    /// Payload description.
    pub payload: PayloadSection,
}

/// Builds the manifest for one payload.
///
/// The files list holds a single entry today but is kept sorted by path so
/// the invariant survives multi-file packs.
pub fn build_manifest(
    payload_bytes: &[u8],
    canon_version: &str,
    schema_version: u64,
    identity_version: &str,
) -> PackManifest {
    let mut files = vec![PayloadFile {
        path: PAYLOAD_PATH.to_string(),
        sha256: hash_payload(payload_bytes),
        bytes: payload_bytes.len() as u64,
    }];
    files.sort_by(|a, b| a.path.cmp(&b.path));

    PackManifest {
        pack_format_version: PACK_FORMAT_VERSION.to_string(),
        canon_version: canon_version.to_string(),
        schema_version: schema_version.to_string(),
        identity_version: identity_version.to_string(),
        kind: PackKind::Full,
        created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        payload: PayloadSection { files },
    }
}

/// Serializes a manifest to its canonical form: the exact bytes that get
/// signed and written to disk.
pub fn serialize_manifest(manifest: &PackManifest) -> Result<String, serde_json::Error> {
    let value = serde_json::to_value(manifest)?;
    Ok(canonical_string(&value))
}
