use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::validation::ValidationError;

/// Identity-scheme generation.
///
/// Each generation freezes a set of identity-significant fields and their
/// normalization. The set is closed: generations below [`Generation::ACTIVE`]
/// exist only so migration tooling can regenerate redirect entries, and their
/// extraction rules must never change once shipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Generation {
    /// Edition-level region, raw-sorted tags.
    V1,
    /// Region moved to disc level; tags normalized.
    V2,
    /// Product code joined the identity.
    V3,
    /// Multiple associated works replaced the single-work field.
    V4,
}

impl Generation {
    /// The generation used for all current identity computation.
    pub const ACTIVE: Generation = Generation::V4;

    /// Numeric generation (the `N` in `edition:vN:...`).
    pub fn number(self) -> u32 {
        match self {
            Generation::V1 => 1,
            Generation::V2 => 2,
            Generation::V3 => 3,
            Generation::V4 => 4,
        }
    }

    /// Parses a `v<N>` tag.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        match value {
            "v1" => Ok(Generation::V1),
            "v2" => Ok(Generation::V2),
            "v3" => Ok(Generation::V3),
            "v4" => Ok(Generation::V4),
            _ => Err(ValidationError::PatternMismatch {
                field: "generation",
                value: value.to_string(),
            }),
        }
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.number())
    }
}

/// Versioned edition identity string: `edition:v<N>:<64 lowercase hex chars>`.
///
/// The only externally visible format for record identity. A given edition
/// has exactly one current identity (computed with [`Generation::ACTIVE`])
/// but may have carried different identities in past generations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityString(String);

const IDENTITY_PATTERN: &str = r"^edition:v[0-9]+:[a-f0-9]{64}$";

impl IdentityString {
    /// Creates an instance without validation; callers are responsible for conformity.
    pub fn new(value: String) -> Self {
        Self(value)
    }

    /// Parses a validated identity string.
    pub fn parse(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if !Regex::new(IDENTITY_PATTERN)
            .expect("invalid regex")
            .is_match(&s)
        {
            return Err(ValidationError::PatternMismatch {
                field: "IdentityString",
                value: s,
            });
        }
        Ok(Self(s))
    }

    /// Assembles an identity string from a generation and a sha-256 hex digest.
    pub fn from_parts(generation: Generation, hex_digest: &str) -> Self {
        Self(format!("edition:{}:{}", generation, hex_digest))
    }

    /// The generation tag embedded in the string, when it names a known one.
    pub fn generation(&self) -> Option<Generation> {
        let tag = self.0.split(':').nth(1)?;
        Generation::parse(tag).ok()
    }

    /// Whether this identity was computed with the active generation.
    pub fn is_current_generation(&self) -> bool {
        self.generation() == Some(Generation::ACTIVE)
    }
}

impl From<String> for IdentityString {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for IdentityString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdentityString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
