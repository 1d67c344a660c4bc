use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Sentinel used by generation-1 hashing when an edition records no region.
pub const REGION_NONE: &str = "NONE";

/// Region table from `schema/regions.json`: the canonical region list plus
/// alias mappings (lowercase alias to canonical code).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionTable {
    /// Canonical region codes.
    #[serde(default)]
    pub canonical: Vec<String>,
    /// Alias to canonical code mappings.
    #[serde(default)]
    pub mappings: BTreeMap<String, String>,
}

impl RegionTable {
    /// Normalizes a raw region value: trim, look up the lowercased alias in
    /// the mapping table (falling back to the trimmed raw value), uppercase.
    ///
    /// Returns `None` when the input holds nothing but whitespace.
    pub fn normalize(&self, raw: &str) -> Option<String> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        let mapped = self
            .mappings
            .get(&trimmed.to_lowercase())
            .map(String::as_str)
            .unwrap_or(trimmed);
        Some(mapped.to_uppercase())
    }

    /// Like [`normalize`](Self::normalize) but with the generation-1
    /// [`REGION_NONE`] sentinel for the empty case.
    pub fn normalize_or_sentinel(&self, raw: &str) -> String {
        self.normalize(raw)
            .unwrap_or_else(|| REGION_NONE.to_string())
    }
}
