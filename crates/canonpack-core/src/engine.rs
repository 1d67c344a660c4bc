//! Versioned identity extraction and hashing.
//!
//! Each identity-scheme generation is a pure extraction over the loose
//! edition document: it selects the identity-significant fields, normalizes
//! them, and hashes the canonical encoding of the result. Generations below
//! the active one are frozen: they exist only so migration tooling can
//! regenerate redirect entries, and must never change once shipped.
//!
//! Non-identity fields (`notes`, `external_refs`, `packaging.notes`, disc
//! work back-references) never reach the extracted object, so they can never
//! affect the hash.

use serde_json::{Map, Value};

use canonpack_canonical::{hash_value, normalize_product_code, normalize_tag};
use canonpack_canonical::{canonical_string, Generation, IdentityString};

use crate::errors::IdentityError;
use crate::regions::RegionTable;

/// Computes the current identity of an edition.
///
/// This is the single public entry point for new identity computation; it
/// always uses [`Generation::ACTIVE`].
pub fn compute_identity(
    edition: &Value,
    regions: &RegionTable,
) -> Result<IdentityString, IdentityError> {
    compute_identity_at(Generation::ACTIVE, edition, regions)
}

/// Computes an edition's identity under a specific generation.
///
/// Generations below the active one are for migration only: they regenerate
/// the legacy side of redirect entries and are never used to mint a current
/// identity.
pub fn compute_identity_at(
    generation: Generation,
    edition: &Value,
    regions: &RegionTable,
) -> Result<IdentityString, IdentityError> {
    let doc = edition.as_object().ok_or(IdentityError::NotAnObject)?;
    let extracted = Value::Object(match generation {
        Generation::V1 => extract_v1(doc, regions),
        Generation::V2 => extract_v2(doc, regions),
        Generation::V3 => extract_v3(doc, regions),
        Generation::V4 => extract_v4(doc, regions),
    });
    Ok(IdentityString::from_parts(
        generation,
        &hash_value(&extracted),
    ))
}

/// Generation 1: edition-level region, raw-sorted tags, single work.
fn extract_v1(doc: &Map<String, Value>, regions: &RegionTable) -> Map<String, Value> {
    let mut out = Map::new();
    out.insert("discs".to_string(), identity_discs(doc, None));
    out.insert("edition_tags".to_string(), tags_raw_sorted(doc));
    out.insert("movie".to_string(), single_work(doc));
    out.insert("packaging".to_string(), packaging_type(doc));
    out.insert("publisher".to_string(), publisher(doc));
    let raw_region = doc.get("region").and_then(Value::as_str).unwrap_or("");
    out.insert(
        "region".to_string(),
        Value::String(regions.normalize_or_sentinel(raw_region)),
    );
    out.insert("release_year".to_string(), release_year(doc));
    out
}

/// Generation 2: region moves into each disc, tags normalize.
fn extract_v2(doc: &Map<String, Value>, regions: &RegionTable) -> Map<String, Value> {
    let mut out = Map::new();
    out.insert("discs".to_string(), identity_discs(doc, Some(regions)));
    out.insert("edition_tags".to_string(), tags_normalized(doc));
    out.insert("movie".to_string(), single_work(doc));
    out.insert("packaging".to_string(), packaging_type(doc));
    out.insert("publisher".to_string(), publisher(doc));
    out.insert("release_year".to_string(), release_year(doc));
    out
}

/// Generation 3: the product code joins the identity.
fn extract_v3(doc: &Map<String, Value>, regions: &RegionTable) -> Map<String, Value> {
    let mut out = extract_v2(doc, regions);
    out.insert("upc".to_string(), Value::String(product_code(doc)));
    out
}

/// Generation 4 (active): multiple associated works replace the single-work
/// field, sorted by numeric id for order-invariance.
fn extract_v4(doc: &Map<String, Value>, regions: &RegionTable) -> Map<String, Value> {
    let mut out = extract_v3(doc, regions);
    out.remove("movie");
    out.insert("movies".to_string(), work_list(doc));
    out
}

/// Discs as an ordered identity list. Disc order in the source record is
/// identity-significant (reordered discs denote a different physical
/// product), so the list is never sorted. With a region table the per-disc
/// region is included when present (generations 2+); without one the disc
/// carries only count and format (generation 1).
fn identity_discs(doc: &Map<String, Value>, regions: Option<&RegionTable>) -> Value {
    let discs = match doc.get("discs").and_then(Value::as_array) {
        Some(list) => list,
        None => return Value::Array(Vec::new()),
    };
    Value::Array(
        discs
            .iter()
            .map(|disc| {
                let obj = disc.as_object();
                let mut out = Map::new();
                let count = obj
                    .and_then(|o| o.get("disc_count"))
                    .filter(|c| c.is_number())
                    .cloned()
                    .unwrap_or_else(|| Value::from(1));
                out.insert("disc_count".to_string(), count);
                let format = obj
                    .and_then(|o| o.get("format"))
                    .and_then(scalar_string)
                    .map(|f| f.to_uppercase())
                    .unwrap_or_else(|| "OTHER".to_string());
                out.insert("format".to_string(), Value::String(format));
                if let Some(table) = regions {
                    let raw = obj
                        .and_then(|o| o.get("region"))
                        .and_then(Value::as_str)
                        .unwrap_or("");
                    if let Some(region) = table.normalize(raw) {
                        out.insert("region".to_string(), Value::String(region));
                    }
                }
                Value::Object(out)
            })
            .collect(),
    )
}

/// Generation-1 tags: raw values sorted by their canonical encoding, no
/// normalization. A frozen quirk; later generations normalize first.
fn tags_raw_sorted(doc: &Map<String, Value>) -> Value {
    let mut tags: Vec<Value> = doc
        .get("edition_tags")
        .and_then(Value::as_array)
        .map(|list| list.to_vec())
        .unwrap_or_default();
    tags.sort_by_key(|tag| canonical_string(tag));
    Value::Array(tags)
}

/// Generations 2+: tags deduplicated by normalization, sorted.
fn tags_normalized(doc: &Map<String, Value>) -> Value {
    let mut tags: Vec<String> = doc
        .get("edition_tags")
        .and_then(Value::as_array)
        .map(|list| {
            list.iter()
                .filter_map(|t| t.as_str())
                .map(normalize_tag)
                .filter(|t| !t.is_empty())
                .collect()
        })
        .unwrap_or_default();
    tags.sort();
    tags.dedup();
    Value::Array(tags.into_iter().map(Value::String).collect())
}

/// Generations 1-3: the single associated work, or null.
fn single_work(doc: &Map<String, Value>) -> Value {
    match doc.get("movie").and_then(Value::as_object) {
        Some(movie) => {
            let mut out = Map::new();
            out.insert(
                "id".to_string(),
                movie.get("id").cloned().unwrap_or(Value::Null),
            );
            Value::Object(out)
        }
        None => Value::Null,
    }
}

/// Generation 4: all associated works as `{id}` entries sorted by numeric
/// id, gathered from `movies` or the legacy single `movie` field. Null when
/// the record names no work.
fn work_list(doc: &Map<String, Value>) -> Value {
    let sources: Vec<&Value> = match doc.get("movies").and_then(Value::as_array) {
        Some(list) => list.iter().collect(),
        None => doc.get("movie").into_iter().collect(),
    };
    let mut ids: Vec<Value> = sources
        .iter()
        .filter_map(|source| {
            let id = source.as_object()?.get("id")?;
            if id.is_null() {
                None
            } else {
                Some(id.clone())
            }
        })
        .collect();
    if ids.is_empty() {
        return Value::Null;
    }
    ids.sort_by_key(|id| (id.as_i64().unwrap_or(i64::MAX), canonical_string(id)));
    Value::Array(
        ids.into_iter()
            .map(|id| {
                let mut work = Map::new();
                work.insert("id".to_string(), id);
                Value::Object(work)
            })
            .collect(),
    )
}

fn packaging_type(doc: &Map<String, Value>) -> Value {
    match doc.get("packaging").and_then(Value::as_object) {
        Some(packaging) => {
            let kind = packaging
                .get("type")
                .and_then(scalar_string)
                .map(|t| t.trim().to_lowercase())
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| "other".to_string());
            let mut out = Map::new();
            out.insert("type".to_string(), Value::String(kind));
            Value::Object(out)
        }
        None => Value::Null,
    }
}

fn publisher(doc: &Map<String, Value>) -> Value {
    let name = doc
        .get("publisher")
        .and_then(Value::as_str)
        .unwrap_or("")
        .trim()
        .to_string();
    Value::String(name)
}

fn release_year(doc: &Map<String, Value>) -> Value {
    doc.get("release_year").cloned().unwrap_or(Value::Null)
}

fn product_code(doc: &Map<String, Value>) -> String {
    let raw = doc.get("upc").and_then(scalar_string).unwrap_or_default();
    normalize_product_code(&raw)
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
