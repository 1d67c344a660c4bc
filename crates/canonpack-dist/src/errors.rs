use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading a dataset or building a pack.
#[derive(Debug, Error)]
pub enum DistError {
    /// I/O error during read or write.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Invalid JSON in a dataset file.
    #[error("JSON parse error in {}: {source}", path.display())]
    JsonParse {
        /// Offending file.
        path: PathBuf,
        /// Underlying parse error.
        source: serde_json::Error,
    },
    /// The dataset schema file is missing.
    #[error("dataset schema not found at {}", path.display())]
    SchemaNotFound {
        /// Expected schema location.
        path: PathBuf,
    },
    /// Manifest serialization failed.
    #[error("manifest serialization failed: {0}")]
    ManifestSerialization(#[from] serde_json::Error),
    /// The injected dataset validator rejected the dataset.
    #[error("dataset validation failed: {}", diagnostics.join("; "))]
    ValidationFailed {
        /// Complete diagnostics list from the validator.
        diagnostics: Vec<String>,
    },
}
