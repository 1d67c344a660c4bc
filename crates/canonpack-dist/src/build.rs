//! Build pipeline: load dataset → validate → payload → manifest → write.
//!
//! Stages hand off sequentially and nothing retries: a validation failure
//! stops the build before any artifact is written, and the caller decides
//! whether to re-run. Semantic dataset validation (schema registries, tag
//! registries, product-code authority checks) is not this crate's business;
//! it is an injected capability so tests can substitute a fake.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::dataset::CanonDataset;
use crate::errors::DistError;
use crate::manifest::{build_manifest, serialize_manifest, PackManifest, MANIFEST_FILE, PAYLOAD_PATH};
use crate::payload::{build_payload, hash_payload};

/// Result of an external dataset validation run.
#[derive(Debug, Clone, Default)]
pub struct ValidatorOutcome {
    /// Whether the dataset passed.
    pub ok: bool,
    /// Complete diagnostics list (empty on success).
    pub diagnostics: Vec<String>,
}

/// Injected dataset-validator capability.
pub trait CanonValidator {
    /// Validates the dataset at `canon_path`.
    fn validate(&self, canon_path: &Path) -> ValidatorOutcome;
}

impl<F> CanonValidator for F
where
    F: Fn(&Path) -> ValidatorOutcome,
{
    fn validate(&self, canon_path: &Path) -> ValidatorOutcome {
        self(canon_path)
    }
}

/// Validator backed by an external command, invoked with the dataset root as
/// its final argument. Non-zero exit is a failure; stderr lines become the
/// diagnostics.
#[derive(Debug, Clone)]
pub struct CommandValidator {
    /// Program to run.
    pub program: String,
    /// Arguments before the dataset root.
    pub args: Vec<String>,
}

impl CanonValidator for CommandValidator {
    fn validate(&self, canon_path: &Path) -> ValidatorOutcome {
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(canon_path)
            .output();
        match output {
            Ok(output) if output.status.success() => ValidatorOutcome {
                ok: true,
                diagnostics: Vec::new(),
            },
            Ok(output) => ValidatorOutcome {
                ok: false,
                diagnostics: String::from_utf8_lossy(&output.stderr)
                    .lines()
                    .map(str::to_string)
                    .collect(),
            },
            Err(err) => ValidatorOutcome {
                ok: false,
                diagnostics: vec![format!("validator failed to run: {}", err)],
            },
        }
    }
}

/// Build configuration. Everything is explicit; no environment lookups.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Opaque dataset version label recorded in the manifest.
    pub canon_version: String,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            canon_version: "local".to_string(),
        }
    }
}

/// Result of a successful build.
#[derive(Debug, Clone)]
pub struct BuildResult {
    /// The manifest written to `manifest.json`.
    pub manifest: PackManifest,
    /// Hash of the payload bytes.
    pub payload_hash: String,
    /// Length of the payload in bytes.
    pub payload_bytes: u64,
    /// Pack output directory.
    pub out_dir: PathBuf,
}

/// Builds a pack from a dataset root into `out_dir`.
///
/// Writes `payload/data.json` and `manifest.json` (UTF-8, no trailing
/// newline). The payload hash in the returned result is computed from the
/// exact bytes written.
pub fn build(
    canon_path: &Path,
    out_dir: &Path,
    options: &BuildOptions,
    validator: &dyn CanonValidator,
) -> Result<BuildResult, DistError> {
    let dataset = CanonDataset::load(canon_path)?;

    let outcome = validator.validate(canon_path);
    if !outcome.ok {
        return Err(DistError::ValidationFailed {
            diagnostics: outcome.diagnostics,
        });
    }

    let (_, payload_json) = build_payload(&dataset);
    let payload_hash = hash_payload(payload_json.as_bytes());

    let manifest = build_manifest(
        payload_json.as_bytes(),
        &options.canon_version,
        dataset.schema.version,
        &dataset.schema.identity_version(),
    );
    let manifest_json = serialize_manifest(&manifest)?;

    let payload_path = out_dir.join(PAYLOAD_PATH);
    if let Some(parent) = payload_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&payload_path, payload_json.as_bytes())?;
    fs::write(out_dir.join(MANIFEST_FILE), manifest_json.as_bytes())?;

    Ok(BuildResult {
        payload_bytes: payload_json.len() as u64,
        payload_hash,
        manifest,
        out_dir: out_dir.to_path_buf(),
    })
}
