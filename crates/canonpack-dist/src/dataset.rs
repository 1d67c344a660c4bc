//! Dataset root loading.
//!
//! Layout of a dataset root:
//!
//! ```text
//! <root>/schema/schema.json        required; version + identity contract
//! <root>/schema/publishers.json    optional publisher list
//! <root>/schema/regions.json       optional region table
//! <root>/editions/*.json           one edition object or an array per file
//! <root>/identity_redirects.json   optional redirect table
//! ```
//!
//! Reads are scoped and single-owner: each file is opened, fully read, and
//! closed. Edition files are read in sorted name order, but storage order is
//! irrelevant to the output: the payload builder re-sorts everything that
//! reaches the artifact.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;

use canonpack_core::RegionTable;

use crate::errors::DistError;

/// Identity contract recorded in the dataset schema.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IdentityContract {
    /// Active identity-scheme generation number.
    pub edition_hash_version: u32,
}

/// Dataset schema file: `schema/schema.json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CanonSchema {
    /// Dataset schema version.
    pub version: u64,
    /// Identity contract, absent in pre-contract datasets.
    #[serde(default)]
    pub identity_contract: Option<IdentityContract>,
}

impl CanonSchema {
    /// The `v<N>` identity-scheme tag this dataset declares (`v1` when the
    /// schema predates the identity contract).
    pub fn identity_version(&self) -> String {
        match &self.identity_contract {
            Some(contract) => format!("v{}", contract.edition_hash_version),
            None => "v1".to_string(),
        }
    }
}

/// A fully loaded dataset snapshot.
#[derive(Debug, Clone)]
pub struct CanonDataset {
    /// Parsed schema file.
    pub schema: CanonSchema,
    /// Publisher records, as stored.
    pub publishers: Vec<Value>,
    /// Region table.
    pub regions: RegionTable,
    /// Edition records, as stored.
    pub editions: Vec<Value>,
    /// Raw text of `identity_redirects.json`, when present.
    pub redirects_text: Option<String>,
}

impl CanonDataset {
    /// Loads a dataset from its root directory.
    pub fn load(root: &Path) -> Result<Self, DistError> {
        let schema_path = root.join("schema").join("schema.json");
        if !schema_path.exists() {
            return Err(DistError::SchemaNotFound { path: schema_path });
        }
        let schema: CanonSchema = read_json(&schema_path)?;

        let publishers: Vec<Value> = read_json_or(&root.join("schema").join("publishers.json"))?;
        let regions: RegionTable = read_json_or(&root.join("schema").join("regions.json"))?;

        let mut editions = Vec::new();
        let editions_dir = root.join("editions");
        if editions_dir.exists() {
            for path in sorted_json_files(&editions_dir)? {
                let data: Value = read_json(&path)?;
                match data {
                    Value::Array(items) => editions.extend(items),
                    other => editions.push(other),
                }
            }
        }

        let redirects_path = root.join("identity_redirects.json");
        let redirects_text = if redirects_path.exists() {
            Some(fs::read_to_string(&redirects_path)?)
        } else {
            None
        };

        Ok(Self {
            schema,
            publishers,
            regions,
            editions,
            redirects_text,
        })
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, DistError> {
    let text = fs::read_to_string(path)?;
    serde_json::from_str(&text).map_err(|source| DistError::JsonParse {
        path: path.to_path_buf(),
        source,
    })
}

fn read_json_or<T>(path: &Path) -> Result<T, DistError>
where
    T: serde::de::DeserializeOwned + Default,
{
    if path.exists() {
        read_json(path)
    } else {
        Ok(T::default())
    }
}

fn sorted_json_files(dir: &Path) -> Result<Vec<PathBuf>, DistError> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().map(|ext| ext == "json").unwrap_or(false))
        .collect();
    paths.sort();
    Ok(paths)
}
