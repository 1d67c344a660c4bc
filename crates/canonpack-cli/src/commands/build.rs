//! Build command implementation.

use std::path::Path;

use canonpack_dist::{build, BuildOptions, CanonValidator, CommandValidator, ValidatorOutcome};

/// A validator that accepts everything, used when no external validator
/// command is configured.
struct AcceptAll;

impl CanonValidator for AcceptAll {
    fn validate(&self, _canon_path: &Path) -> ValidatorOutcome {
        ValidatorOutcome {
            ok: true,
            diagnostics: Vec::new(),
        }
    }
}

pub fn run(
    canon: String,
    out: String,
    canon_version: String,
    validator: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = BuildOptions { canon_version };

    let command_validator = validator.map(|program| CommandValidator {
        program,
        args: Vec::new(),
    });
    let validator: &dyn CanonValidator = match &command_validator {
        Some(v) => v,
        None => &AcceptAll,
    };

    let result = build(Path::new(&canon), Path::new(&out), &options, validator)?;
    println!(
        "Built pack at {} (payload {} bytes, sha256 {})",
        result.out_dir.display(),
        result.payload_bytes,
        result.payload_hash
    );
    Ok(())
}
