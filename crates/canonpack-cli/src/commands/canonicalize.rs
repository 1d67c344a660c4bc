//! Canonicalize command implementation: show the canonical bytes the hashing
//! pipeline would see for a JSON document.

use std::fs;
use std::io::Read;

use canonpack_canonical::{canonical_string, sha256_hex};

pub fn run(input: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let text = match input {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let value: serde_json::Value = serde_json::from_str(&text)?;
    let canonical = canonical_string(&value);
    println!("{}", canonical);
    eprintln!("sha256: {}", sha256_hex(canonical.as_bytes()));
    Ok(())
}
