//! Verify command implementation.

use std::path::Path;

use canonpack_dist::{load_verifying_key, verify_pack, VerifyMode};
use serde_json::json;

pub fn run(
    pack: String,
    public_key: Option<String>,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let verifying_key = match &public_key {
        Some(path) => Some(load_verifying_key(Path::new(path))?),
        None => None,
    };

    let report = verify_pack(Path::new(&pack), verifying_key.as_ref());
    let mode = match report.mode {
        VerifyMode::HashOnly => "hash-only",
        VerifyMode::Signed => "signed",
    };

    if json_output {
        let errors: Vec<String> = report.errors.iter().map(|e| e.to_string()).collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "mode": mode,
                "ok": report.ok(),
                "errors": errors
            }))?
        );
    } else if report.ok() {
        println!("OK: pack verified ({})", mode);
    } else {
        eprintln!("Verification failed ({}):", mode);
        for error in &report.errors {
            eprintln!("  - {}", error);
        }
    }

    if !report.ok() {
        std::process::exit(1);
    }
    Ok(())
}
