use serde_json::Value;

/// Produces the canonical textual encoding of a JSON value.
///
/// Two values that are semantically equal under key-order-independence
/// encode to identical text: object keys are sorted by code-point order,
/// list order is preserved (callers sort lists whose order carries no
/// meaning before encoding), and no whitespace is inserted. Strings and
/// numbers use `serde_json`'s token encoding, so there is exactly one
/// spelling per value.
///
/// This function is the sole authority for "two records are identical"
/// and for "this payload byte-matches its hash": every hash in the system
/// is sha-256 over [`canonical_bytes`] with no trailing newline.
pub fn canonical_string(value: &Value) -> String {
    let mut out = String::new();
    encode(value, &mut out);
    out
}

/// Canonical UTF-8 bytes for a JSON value. See [`canonical_string`].
pub fn canonical_bytes(value: &Value) -> Vec<u8> {
    canonical_string(value).into_bytes()
}

fn encode(value: &Value, out: &mut String) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(true) => out.push_str("true"),
        Value::Bool(false) => out.push_str("false"),
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::String(s) => encode_str(s, out),
        Value::Array(items) => {
            out.push('[');
            for (idx, item) in items.iter().enumerate() {
                if idx > 0 {
                    out.push(',');
                }
                encode(item, out);
            }
            out.push(']');
        }
        Value::Object(map) => {
            // serde_json may preserve insertion order depending on features;
            // sort explicitly so the encoding never depends on it.
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort_unstable();
            out.push('{');
            for (idx, key) in keys.into_iter().enumerate() {
                if idx > 0 {
                    out.push(',');
                }
                encode_str(key, out);
                out.push(':');
                encode(&map[key], out);
            }
            out.push('}');
        }
    }
}

fn encode_str(s: &str, out: &mut String) {
    let quoted = serde_json::to_string(s).expect("string serialization is infallible");
    out.push_str(&quoted);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalars_encode_compactly() {
        assert_eq!(canonical_string(&json!(null)), "null");
        assert_eq!(canonical_string(&json!(true)), "true");
        assert_eq!(canonical_string(&json!(42)), "42");
        assert_eq!(canonical_string(&json!("a\"b")), r#""a\"b""#);
    }

    #[test]
    fn nested_object_keys_are_sorted() {
        let value = json!({"b": 1, "a": {"z": [3, 2], "y": null}});
        assert_eq!(
            canonical_string(&value),
            r#"{"a":{"y":null,"z":[3,2]},"b":1}"#
        );
    }
}
