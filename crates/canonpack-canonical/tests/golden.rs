use canonpack_canonical::{
    canonical_bytes, canonical_string, hash_value, normalize_product_code, normalize_tag,
    sha256_hex, Generation, IdentityString,
};
use serde_json::json;

#[test]
fn canonical_encoding_is_key_order_invariant() {
    // serde_json sorts object keys on parse, so build the two orderings
    // from text to make the shuffle real.
    let a: serde_json::Value =
        serde_json::from_str(r#"{"z":1,"a":{"inner":[1,2],"first":true},"m":null}"#).unwrap();
    let b: serde_json::Value =
        serde_json::from_str(r#"{"a":{"first":true,"inner":[1,2]},"m":null,"z":1}"#).unwrap();
    assert_eq!(canonical_bytes(&a), canonical_bytes(&b));
}

#[test]
fn canonical_encoding_matches_golden_bytes() {
    let value = json!({
        "b": [3, 1, 2],
        "a": {"nested": "x"},
        "empty": {},
        "s": "quote\"and\\slash"
    });
    assert_eq!(
        canonical_string(&value),
        r#"{"a":{"nested":"x"},"b":[3,1,2],"empty":{},"s":"quote\"and\\slash"}"#
    );
}

#[test]
fn canonical_encoding_preserves_list_order() {
    let forward = json!({"items": [1, 2, 3]});
    let reversed = json!({"items": [3, 2, 1]});
    assert_ne!(canonical_bytes(&forward), canonical_bytes(&reversed));
}

#[test]
fn hash_value_is_sha256_of_canonical_bytes() {
    let value = json!({"k": "v"});
    assert_eq!(hash_value(&value), sha256_hex(br#"{"k":"v"}"#));
    assert_eq!(
        sha256_hex(b""),
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
    );
}

#[test]
fn identity_string_round_trips_through_parts() {
    let hex = "a".repeat(64);
    let id = IdentityString::from_parts(Generation::V4, &hex);
    assert_eq!(id.as_ref(), format!("edition:v4:{}", hex));
    assert_eq!(id.generation(), Some(Generation::V4));
    assert!(id.is_current_generation());

    let parsed = IdentityString::parse(id.as_ref()).unwrap();
    assert_eq!(parsed, id);
}

#[test]
fn identity_string_rejects_malformed_values() {
    assert!(IdentityString::parse("edition:v4:short").is_err());
    assert!(IdentityString::parse(format!("edition:v4:{}", "A".repeat(64))).is_err());
    assert!(IdentityString::parse(format!("release:v4:{}", "a".repeat(64))).is_err());
    assert!(IdentityString::parse(format!("edition:4:{}", "a".repeat(64))).is_err());
}

#[test]
fn legacy_generation_tags_are_not_current() {
    let id = IdentityString::from_parts(Generation::V2, &"f".repeat(64));
    assert_eq!(id.generation(), Some(Generation::V2));
    assert!(!id.is_current_generation());
}

#[test]
fn normalizers_match_frozen_behavior() {
    assert_eq!(normalize_product_code("0 12345 67890 5"), "012345678905");
    assert_eq!(normalize_tag("Region-Free"), "region_free");
}
