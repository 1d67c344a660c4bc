//! End-to-end pipeline test: build, sign, verify, and redirect validation
//! over one dataset, the way the CLI drives them.

use std::fs;
use std::path::Path;

use canonpack_canonical::Generation;
use canonpack_core::redirect::validate_redirects;
use canonpack_core::{compute_identity_at, to_canonical_shape, RedirectMap};
use canonpack_dist::{
    build, sign_manifest_bytes, verify_pack, BuildOptions, CanonDataset, ValidatorOutcome,
    MANIFEST_FILE, SIGNATURE_PATH,
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

fn write_dataset(dir: &Path) {
    fs::create_dir_all(dir.join("schema")).unwrap();
    fs::create_dir_all(dir.join("editions")).unwrap();
    fs::write(
        dir.join("schema/schema.json"),
        json!({"version": 3, "identity_contract": {"edition_hash_version": 4}}).to_string(),
    )
    .unwrap();
    fs::write(
        dir.join("schema/regions.json"),
        json!({"canonical": ["A", "B"], "mappings": {"a": "A", "b": "B"}}).to_string(),
    )
    .unwrap();
    fs::write(
        dir.join("editions/fight_club.json"),
        json!({
            "movie": {"id": 550},
            "release_year": 1999,
            "publisher": "warner_bros",
            "packaging": {"type": "keepcase"},
            "upc": "012345678905",
            "edition_tags": ["theatrical"],
            "discs": [{"format": "BLURAY", "disc_count": 1, "region": "A"}]
        })
        .to_string(),
    )
    .unwrap();
}

/// Writes the redirect entries the migration tooling would have generated.
fn write_redirects(dir: &Path) {
    let dataset = CanonDataset::load(dir).unwrap();
    let mut redirects = serde_json::Map::new();
    for edition in &dataset.editions {
        let shape = to_canonical_shape(edition).unwrap();
        let current = compute_identity_at(Generation::ACTIVE, &shape, &dataset.regions).unwrap();
        for legacy_generation in [Generation::V2, Generation::V3] {
            let legacy = compute_identity_at(legacy_generation, &shape, &dataset.regions).unwrap();
            if legacy != current {
                redirects.insert(legacy.to_string(), json!(current.to_string()));
            }
        }
    }
    fs::write(
        dir.join("identity_redirects.json"),
        serde_json::Value::Object(redirects).to_string(),
    )
    .unwrap();
}

#[test]
fn full_pipeline_build_sign_verify() {
    let canon = TempDir::new().unwrap();
    write_dataset(canon.path());
    let out = TempDir::new().unwrap();

    let result = build(
        canon.path(),
        out.path(),
        &BuildOptions {
            canon_version: "e2e".to_string(),
        },
        &accept_all,
    )
    .unwrap();
    assert_eq!(result.manifest.identity_version, "v4");

    let key = SigningKey::from_bytes(&[11u8; 32]);
    let manifest_bytes = fs::read(out.path().join(MANIFEST_FILE)).unwrap();
    let signature = sign_manifest_bytes(&manifest_bytes, &key);
    fs::create_dir_all(out.path().join("signature")).unwrap();
    fs::write(out.path().join(SIGNATURE_PATH), signature).unwrap();

    let report = verify_pack(out.path(), Some(&key.verifying_key()));
    assert!(report.ok(), "unexpected: {:?}", report.errors);
}

#[test]
fn generated_redirect_map_validates_cleanly() {
    let canon = TempDir::new().unwrap();
    write_dataset(canon.path());
    write_redirects(canon.path());

    let dataset = CanonDataset::load(canon.path()).unwrap();
    let parsed = RedirectMap::parse_json(dataset.redirects_text.as_deref().unwrap()).unwrap();
    assert_eq!(parsed.map.len(), 2);

    let violations = validate_redirects(&parsed, &dataset.editions, &dataset.regions);
    assert!(violations.is_empty(), "unexpected: {:?}", violations);
}

#[test]
fn redirect_map_with_chain_fails_validation() {
    let canon = TempDir::new().unwrap();
    write_dataset(canon.path());

    let dataset = CanonDataset::load(canon.path()).unwrap();
    let shape = to_canonical_shape(&dataset.editions[0]).unwrap();
    let v2 = compute_identity_at(Generation::V2, &shape, &dataset.regions).unwrap();
    let v3 = compute_identity_at(Generation::V3, &shape, &dataset.regions).unwrap();
    let v4 = compute_identity_at(Generation::V4, &shape, &dataset.regions).unwrap();

    // v2 -> v3 -> v4 is an un-flattened history.
    let mut chained = serde_json::Map::new();
    chained.insert(v2.to_string(), json!(v3.to_string()));
    chained.insert(v3.to_string(), json!(v4.to_string()));
    let text = serde_json::Value::Object(chained).to_string();
    let parsed = RedirectMap::parse_json(&text).unwrap();
    let violations = validate_redirects(&parsed, &dataset.editions, &dataset.regions);
    assert!(!violations.is_empty());
    assert!(parsed.map.resolve(v2.as_ref()).is_err());
    assert_eq!(parsed.map.resolve(v3.as_ref()).unwrap(), v4.to_string());
}
