//! Deterministic payload assembly.
//!
//! The payload is the entire dataset rendered as one canonical byte
//! sequence. Invariants enforced here, not left to callers:
//!
//! - no timestamps, file paths, or build metadata ever appear inside it;
//! - publishers sort by `publisher_id`;
//! - the canonical region list sorts lexicographically;
//! - each edition's `external_refs` sort by (source, id);
//! - the edition list sorts by each edition's own canonical encoding, a
//!   total, content-derived order independent of storage order or filenames.
//!
//! Two builds over an unchanged dataset are byte-identical.

use serde_json::{Map, Value};

use canonpack_canonical::{canonical_string, sha256_hex};

use crate::dataset::CanonDataset;

/// Assembles the payload object and its canonical serialization.
pub fn build_payload(dataset: &CanonDataset) -> (Value, String) {
    let mut publishers = dataset.publishers.clone();
    publishers.sort_by_key(|publisher| {
        publisher
            .get("publisher_id")
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string()
    });

    let mut region_list = dataset.regions.canonical.clone();
    region_list.sort();
    let mut regions = Map::new();
    regions.insert(
        "canonical".to_string(),
        Value::Array(region_list.into_iter().map(Value::String).collect()),
    );
    regions.insert(
        "mappings".to_string(),
        Value::Object(
            dataset
                .regions
                .mappings
                .iter()
                .map(|(alias, code)| (alias.clone(), Value::String(code.clone())))
                .collect(),
        ),
    );

    let mut editions: Vec<Value> = dataset.editions.iter().map(sort_external_refs).collect();
    editions.sort_by_key(canonical_string);

    let mut payload = Map::new();
    payload.insert(
        "schema_version".to_string(),
        Value::String(dataset.schema.version.to_string()),
    );
    payload.insert(
        "identity_version".to_string(),
        Value::String(dataset.schema.identity_version()),
    );
    payload.insert("publishers".to_string(), Value::Array(publishers));
    payload.insert("regions".to_string(), Value::Object(regions));
    payload.insert("editions".to_string(), Value::Array(editions));

    let payload = Value::Object(payload);
    let json = canonical_string(&payload);
    (payload, json)
}

/// Hashes payload bytes: sha-256, lowercase hex.
pub fn hash_payload(bytes: &[u8]) -> String {
    sha256_hex(bytes)
}

/// Re-sorts an edition's embedded cross-reference list by (source, id).
fn sort_external_refs(edition: &Value) -> Value {
    let mut edition = edition.clone();
    if let Some(refs) = edition
        .as_object_mut()
        .and_then(|obj| obj.get_mut("external_refs"))
        .and_then(Value::as_array_mut)
    {
        refs.sort_by_key(|r| {
            let source = r.get("source").and_then(Value::as_str).unwrap_or("");
            let id = r.get("id").and_then(Value::as_str).unwrap_or("");
            (source.to_string(), id.to_string())
        });
    }
    edition
}
