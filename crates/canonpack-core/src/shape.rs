//! Canonical storage shape for edition records.
//!
//! The input is a loosely-typed document that has already passed external
//! semantic validation; the output is the strict canonical shape the curation
//! repository stores. Empty strings are entropy: absence is preferred over
//! empty values, so every rule drops fields that normalize to nothing.
//!
//! The mapping is a single declarative rule table (field, mapper) so the set
//! of fields that make it into the canonical shape is enumerable and each
//! rule is independently testable.

use serde_json::{Map, Value};

use canonpack_canonical::{normalize_product_code, normalize_tag};

use crate::errors::ShapeError;

type FieldMapper = fn(&Map<String, Value>) -> Option<Value>;

struct FieldRule {
    field: &'static str,
    map: FieldMapper,
}

const RULES: &[FieldRule] = &[
    FieldRule {
        field: "movies",
        map: map_movies,
    },
    FieldRule {
        field: "release_year",
        map: map_release_year,
    },
    FieldRule {
        field: "publisher",
        map: map_publisher,
    },
    FieldRule {
        field: "packaging",
        map: map_packaging,
    },
    FieldRule {
        field: "discs",
        map: map_discs,
    },
    FieldRule {
        field: "upc",
        map: map_upc,
    },
    FieldRule {
        field: "edition_tags",
        map: map_edition_tags,
    },
    FieldRule {
        field: "notes",
        map: map_notes,
    },
    FieldRule {
        field: "external_refs",
        map: map_external_refs,
    },
];

/// The complete set of fields a canonical edition may carry, in output order.
pub fn canonical_fields() -> Vec<&'static str> {
    RULES.iter().map(|rule| rule.field).collect()
}

/// Maps a loose edition document to its canonical storage shape.
///
/// Legacy single-work records (`movie`) are lifted into a one-element
/// `movies` list; everything that normalizes to empty is dropped.
pub fn to_canonical_shape(doc: &Value) -> Result<Value, ShapeError> {
    let map = doc.as_object().ok_or(ShapeError::NotAnObject)?;
    let mut out = Map::new();
    for rule in RULES {
        if let Some(value) = (rule.map)(map) {
            out.insert(rule.field.to_string(), value);
        }
    }
    Ok(Value::Object(out))
}

fn trimmed(value: Option<&Value>) -> Option<String> {
    let s = value?.as_str()?.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// String form of a scalar the way loose documents spell them: strings pass
/// through, numbers print in decimal, everything else is absent.
fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn map_movies(doc: &Map<String, Value>) -> Option<Value> {
    let sources: Vec<&Value> = match doc.get("movies").and_then(Value::as_array) {
        Some(list) => list.iter().collect(),
        None => doc.get("movie").into_iter().collect(),
    };

    let mut works: Vec<Value> = Vec::new();
    for source in sources {
        let obj = match source.as_object() {
            Some(obj) => obj,
            None => continue,
        };
        let id = match obj.get("id") {
            Some(id) if !id.is_null() => id.clone(),
            _ => continue,
        };
        let mut work = Map::new();
        work.insert("id".to_string(), id);
        if let Some(studios) = obj.get("studios").and_then(Value::as_array) {
            let mut names: Vec<String> = studios
                .iter()
                .filter_map(|s| trimmed(Some(s)))
                .collect();
            if !names.is_empty() {
                names.sort();
                work.insert(
                    "studios".to_string(),
                    Value::Array(names.into_iter().map(Value::String).collect()),
                );
            }
        }
        works.push(Value::Object(work));
    }

    if works.is_empty() {
        return None;
    }
    works.sort_by_key(work_sort_key);
    Some(Value::Array(works))
}

fn work_sort_key(work: &Value) -> (i64, String) {
    let id = work.get("id").and_then(Value::as_i64).unwrap_or(i64::MAX);
    (id, canonpack_canonical::canonical_string(work))
}

fn map_release_year(doc: &Map<String, Value>) -> Option<Value> {
    match doc.get("release_year") {
        Some(year) if !year.is_null() => Some(year.clone()),
        _ => None,
    }
}

fn map_publisher(doc: &Map<String, Value>) -> Option<Value> {
    trimmed(doc.get("publisher")).map(Value::String)
}

fn map_packaging(doc: &Map<String, Value>) -> Option<Value> {
    let packaging = doc.get("packaging")?.as_object()?;
    let mut out = Map::new();
    if let Some(kind) = trimmed(packaging.get("type")) {
        out.insert("type".to_string(), Value::String(kind.to_lowercase()));
    }
    if let Some(notes) = trimmed(packaging.get("notes")) {
        out.insert("notes".to_string(), Value::String(notes));
    }
    if out.is_empty() {
        None
    } else {
        Some(Value::Object(out))
    }
}

fn map_discs(doc: &Map<String, Value>) -> Option<Value> {
    let discs = doc.get("discs")?.as_array()?;
    if discs.is_empty() {
        return None;
    }
    let shaped: Vec<Value> = discs
        .iter()
        .map(|disc| {
            let obj = disc.as_object();
            let mut out = Map::new();
            let format = obj
                .and_then(|o| o.get("format"))
                .and_then(scalar_string)
                .map(|f| f.to_uppercase())
                .unwrap_or_else(|| "OTHER".to_string());
            out.insert("format".to_string(), Value::String(format));
            let count = obj
                .and_then(|o| o.get("disc_count"))
                .filter(|c| c.is_number())
                .cloned()
                .unwrap_or_else(|| Value::from(1));
            out.insert("disc_count".to_string(), count);
            if let Some(region) = obj.and_then(|o| trimmed(o.get("region"))) {
                out.insert("region".to_string(), Value::String(region));
            }
            if let Some(movie_id) = obj.and_then(|o| o.get("movie_id")).filter(|v| !v.is_null()) {
                out.insert("movie_id".to_string(), movie_id.clone());
            }
            Value::Object(out)
        })
        .collect();
    Some(Value::Array(shaped))
}

fn map_upc(doc: &Map<String, Value>) -> Option<Value> {
    let raw = doc.get("upc").and_then(scalar_string)?;
    let digits = normalize_product_code(&raw);
    if digits.is_empty() {
        None
    } else {
        Some(Value::String(digits))
    }
}

fn map_edition_tags(doc: &Map<String, Value>) -> Option<Value> {
    let tags = doc.get("edition_tags")?.as_array()?;
    let mut normalized: Vec<String> = tags
        .iter()
        .filter_map(|t| t.as_str())
        .map(normalize_tag)
        .filter(|t| !t.is_empty())
        .collect();
    if normalized.is_empty() {
        return None;
    }
    normalized.sort();
    normalized.dedup();
    Some(Value::Array(
        normalized.into_iter().map(Value::String).collect(),
    ))
}

fn map_notes(doc: &Map<String, Value>) -> Option<Value> {
    trimmed(doc.get("notes")).map(Value::String)
}

fn map_external_refs(doc: &Map<String, Value>) -> Option<Value> {
    let refs = doc.get("external_refs")?.as_array()?;
    let mut cleaned: Vec<(String, String, Option<String>)> = refs
        .iter()
        .filter_map(|r| {
            let obj = r.as_object()?;
            let source = trimmed(obj.get("source"))?.to_lowercase();
            let id = obj.get("id").and_then(scalar_string)?.trim().to_string();
            if id.is_empty() {
                return None;
            }
            Some((source, id, trimmed(obj.get("url"))))
        })
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.sort();
    Some(Value::Array(
        cleaned
            .into_iter()
            .map(|(source, id, url)| {
                let mut out = Map::new();
                out.insert("source".to_string(), Value::String(source));
                out.insert("id".to_string(), Value::String(id));
                if let Some(url) = url {
                    out.insert("url".to_string(), Value::String(url));
                }
                Value::Object(out)
            })
            .collect(),
    ))
}
