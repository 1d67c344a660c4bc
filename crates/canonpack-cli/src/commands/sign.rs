//! Sign command implementation. Build and sign are separate stages: run
//! after a successful build.

use std::fs;
use std::path::Path;

use canonpack_dist::{load_signing_key, sign_manifest_bytes, MANIFEST_FILE, SIGNATURE_PATH};

pub fn run(pack: String, key: String) -> Result<(), Box<dyn std::error::Error>> {
    let pack_root = Path::new(&pack);
    let manifest_path = pack_root.join(MANIFEST_FILE);
    if !manifest_path.exists() {
        return Err(format!("manifest.json not found at {}", manifest_path.display()).into());
    }

    let signing_key = load_signing_key(Path::new(&key))?;
    let manifest_bytes = fs::read(&manifest_path)?;
    let signature = sign_manifest_bytes(&manifest_bytes, &signing_key);

    let signature_path = pack_root.join(SIGNATURE_PATH);
    if let Some(parent) = signature_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&signature_path, signature)?;
    println!("Signed manifest -> {}", signature_path.display());
    Ok(())
}
