//! Detached-signature tests over real packs: sign after build, verify with
//! the matching key, and make sure authenticity failures stay separate from
//! integrity failures.

use std::fs;
use std::path::Path;

use canonpack_dist::{
    build, load_signing_key, load_verifying_key, sign_manifest_bytes, verify_pack, BuildOptions,
    ValidatorOutcome, VerifyError, VerifyMode, MANIFEST_FILE, PAYLOAD_PATH, SIGNATURE_PATH,
};
use ed25519_dalek::SigningKey;
use serde_json::json;
use tempfile::TempDir;

fn accept_all(_: &Path) -> ValidatorOutcome {
    ValidatorOutcome {
        ok: true,
        diagnostics: Vec::new(),
    }
}

fn write_canon(dir: &Path) {
    fs::create_dir_all(dir.join("schema")).unwrap();
    fs::create_dir_all(dir.join("editions")).unwrap();
    fs::write(
        dir.join("schema/schema.json"),
        json!({"version": 3, "identity_contract": {"edition_hash_version": 4}}).to_string(),
    )
    .unwrap();
    fs::write(
        dir.join("editions/0001.json"),
        json!({
            "movies": [{"id": 550}],
            "release_year": 1999,
            "publisher": "warner_bros",
            "packaging": {"type": "keepcase"},
            "discs": [{"format": "BLURAY", "disc_count": 1, "region": "A"}]
        })
        .to_string(),
    )
    .unwrap();
}

/// Builds a pack and signs its manifest, returning the signing key.
fn build_and_sign(out: &Path) -> SigningKey {
    let canon = TempDir::new().unwrap();
    write_canon(canon.path());
    build(
        canon.path(),
        out,
        &BuildOptions {
            canon_version: "signing-test".to_string(),
        },
        &accept_all,
    )
    .unwrap();

    let key = SigningKey::from_bytes(&[42u8; 32]);
    let manifest_bytes = fs::read(out.join(MANIFEST_FILE)).unwrap();
    let signature = sign_manifest_bytes(&manifest_bytes, &key);
    fs::create_dir_all(out.join("signature")).unwrap();
    fs::write(out.join(SIGNATURE_PATH), signature).unwrap();
    key
}

#[test]
fn valid_signature_over_unmodified_manifest_verifies() {
    let out = TempDir::new().unwrap();
    let key = build_and_sign(out.path());

    let report = verify_pack(out.path(), Some(&key.verifying_key()));
    assert_eq!(report.mode, VerifyMode::Signed);
    assert!(report.ok(), "unexpected: {:?}", report.errors);
}

#[test]
fn mutated_manifest_is_an_authenticity_error_not_a_hash_error() {
    let out = TempDir::new().unwrap();
    let key = build_and_sign(out.path());

    // Change one byte of the manifest while keeping it valid JSON: the
    // payload hash it records is untouched, so only the signature breaks.
    let manifest_path = out.path().join(MANIFEST_FILE);
    let text = fs::read_to_string(&manifest_path).unwrap();
    assert!(text.contains("signing-test"));
    fs::write(&manifest_path, text.replace("signing-test", "signing-tesT")).unwrap();

    let report = verify_pack(out.path(), Some(&key.verifying_key()));
    assert!(!report.ok());
    assert_eq!(report.errors, vec![VerifyError::SignatureInvalid]);
}

#[test]
fn tampered_signature_file_fails_verification() {
    let out = TempDir::new().unwrap();
    let key = build_and_sign(out.path());

    let sig_path = out.path().join(SIGNATURE_PATH);
    let mut signature = fs::read(&sig_path).unwrap();
    signature[0] ^= 0x01;
    fs::write(&sig_path, signature).unwrap();

    let report = verify_pack(out.path(), Some(&key.verifying_key()));
    assert_eq!(report.errors, vec![VerifyError::SignatureInvalid]);
}

#[test]
fn wrong_public_key_fails_verification() {
    let out = TempDir::new().unwrap();
    build_and_sign(out.path());

    let wrong_key = SigningKey::from_bytes(&[43u8; 32]);
    let report = verify_pack(out.path(), Some(&wrong_key.verifying_key()));
    assert_eq!(report.errors, vec![VerifyError::SignatureInvalid]);
}

#[test]
fn missing_signature_with_key_supplied_is_an_authenticity_failure() {
    let out = TempDir::new().unwrap();
    let key = build_and_sign(out.path());
    fs::remove_file(out.path().join(SIGNATURE_PATH)).unwrap();

    let report = verify_pack(out.path(), Some(&key.verifying_key()));
    assert!(!report.ok());
    assert!(report.errors.iter().all(VerifyError::is_authenticity_failure));

    // Without a key the same pack passes: hash-only is an explicit mode.
    let hash_only = verify_pack(out.path(), None);
    assert_eq!(hash_only.mode, VerifyMode::HashOnly);
    assert!(hash_only.ok());
}

#[test]
fn corrupted_payload_with_valid_signature_is_an_integrity_failure() {
    let out = TempDir::new().unwrap();
    let key = build_and_sign(out.path());

    let payload_path = out.path().join(PAYLOAD_PATH);
    let mut payload = fs::read(&payload_path).unwrap();
    let last = payload.len() - 1;
    payload[last] ^= 0x01;
    fs::write(&payload_path, payload).unwrap();

    let report = verify_pack(out.path(), Some(&key.verifying_key()));
    assert!(!report.ok());
    // The signature still verifies; every failure is on the integrity side.
    assert!(report.errors.iter().all(|e| !e.is_authenticity_failure()));
    assert!(report
        .errors
        .iter()
        .any(|e| matches!(e, VerifyError::HashMismatch { .. })));
}

#[test]
fn raw_key_files_round_trip() {
    let dir = TempDir::new().unwrap();
    let key = SigningKey::from_bytes(&[9u8; 32]);
    let private_path = dir.path().join("signing.key");
    let public_path = dir.path().join("signing.pub");
    fs::write(&private_path, key.to_bytes()).unwrap();
    fs::write(&public_path, key.verifying_key().to_bytes()).unwrap();

    let loaded_private = load_signing_key(&private_path).unwrap();
    let loaded_public = load_verifying_key(&public_path).unwrap();
    let signature = sign_manifest_bytes(b"bytes", &loaded_private);
    assert!(canonpack_dist::verify_manifest_signature(
        b"bytes",
        &signature,
        &loaded_public
    ));

    fs::write(&private_path, b"too short").unwrap();
    assert!(load_signing_key(&private_path).is_err());
}
