//! Superseded-identity redirects.
//!
//! The redirect map is a flat legacy-identity to current-identity table,
//! maintained by external migration tooling and validated here before a
//! release ships. Resolution is strictly single-hop: multi-hop histories
//! must already be flattened, and a chain or loop observed at resolution
//! time is a hard failure, not something to silently chase.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::de::{Deserializer, MapAccess, Visitor};
use serde_json::Value;
use thiserror::Error;

use canonpack_canonical::{Generation, IdentityString};

use crate::engine::compute_identity_at;
use crate::regions::RegionTable;
use crate::shape::to_canonical_shape;

/// Errors raised by single-hop resolution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RedirectError {
    /// The identity to resolve was empty.
    #[error("identity must be a non-empty string")]
    EmptyIdentity,
    /// An entry points at itself.
    #[error("identity redirect loop: {identity} points to itself")]
    SelfLoop {
        /// The self-referential identity.
        identity: String,
    },
    /// An entry's target is itself a key (un-flattened chain).
    #[error("identity redirect chain: {from} -> {via} -> ... (redirects must be flattened)")]
    Chain {
        /// The identity being resolved.
        from: String,
        /// The intermediate target that is also a key.
        via: String,
    },
}

/// A structural violation found while validating a redirect map.
///
/// Validation is batch-mode: every violation is reported so a curator can
/// fix the whole map in one pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RedirectViolation {
    /// A redirect target is not the identity of any current edition.
    #[error("redirect target does not exist: {from} -> {to}")]
    DanglingTarget {
        /// Redirect key.
        from: String,
        /// Missing target.
        to: String,
    },
    /// A redirect target carries an older generation tag.
    #[error("redirect target must be a current-generation identity, got: {to}")]
    StaleTarget {
        /// Redirect key.
        from: String,
        /// Stale target.
        to: String,
    },
    /// A redirect target is itself a key.
    #[error("redirect chain: {from} -> {via} -> ... (must be flattened)")]
    Chain {
        /// Redirect key.
        from: String,
        /// Target that is also a key.
        via: String,
    },
    /// A redirect key maps to itself.
    #[error("redirect loop: {identity} points to itself")]
    SelfLoop {
        /// The self-referential identity.
        identity: String,
    },
    /// The same key appeared more than once in the redirect file.
    #[error("duplicate redirect key: {key}")]
    DuplicateKey {
        /// The repeated key.
        key: String,
    },
    /// An edition's legacy-generation hash differs from its current hash
    /// but the map carries no entry for it.
    #[error("missing redirect for superseded identity: {legacy} (edition now hashes to {current})")]
    MissingRedirect {
        /// The uncovered legacy identity.
        legacy: String,
        /// The edition's current identity.
        current: String,
    },
    /// An edition in the dataset is not a structured record.
    #[error("edition at index {index} is not a structured record")]
    MalformedEdition {
        /// Position in the edition list.
        index: usize,
    },
}

/// Flat legacy-identity to current-identity map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedirectMap {
    entries: BTreeMap<String, String>,
}

/// A redirect map plus the duplicate keys its source text carried.
///
/// JSON object parsing normally collapses duplicate keys silently; the
/// dedicated parser keeps them visible so validation can reject the file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedRedirects {
    /// The parsed map (last occurrence wins for duplicated keys).
    pub map: RedirectMap,
    /// Keys that appeared more than once in the source text.
    pub duplicate_keys: Vec<String>,
}

impl RedirectMap {
    /// Builds a map from entries (test and tooling convenience).
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Parses the redirect table file, reporting duplicate keys instead of
    /// collapsing them.
    pub fn parse_json(text: &str) -> Result<ParsedRedirects, serde_json::Error> {
        struct RedirectVisitor;

        impl<'de> Visitor<'de> for RedirectVisitor {
            type Value = ParsedRedirects;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a flat string-to-string object")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = BTreeMap::new();
                let mut duplicate_keys = Vec::new();
                while let Some((key, value)) = access.next_entry::<String, String>()? {
                    if entries.insert(key.clone(), value).is_some() {
                        duplicate_keys.push(key);
                    }
                }
                Ok(ParsedRedirects {
                    map: RedirectMap { entries },
                    duplicate_keys,
                })
            }
        }

        let mut deserializer = serde_json::Deserializer::from_str(text);
        let parsed = deserializer.deserialize_map(RedirectVisitor)?;
        deserializer.end()?;
        Ok(parsed)
    }

    /// Whether the map carries an entry for this identity.
    pub fn contains(&self, identity: &str) -> bool {
        self.entries.contains_key(identity)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates `(legacy, current)` entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.entries
            .iter()
            .map(|(from, to)| (from.as_str(), to.as_str()))
    }

    /// Resolves an identity through the map, single-hop.
    ///
    /// Non-keys come back unchanged (already current); resolution is
    /// idempotent on them. A key whose target is itself a key, or which maps
    /// to itself, fails: the map was expected to be validated before it
    /// shipped, so either case means a broken release.
    pub fn resolve(&self, identity: &str) -> Result<String, RedirectError> {
        let trimmed = identity.trim();
        if trimmed.is_empty() {
            return Err(RedirectError::EmptyIdentity);
        }
        match self.entries.get(trimmed) {
            None => Ok(trimmed.to_string()),
            Some(target) if target == trimmed => Err(RedirectError::SelfLoop {
                identity: trimmed.to_string(),
            }),
            Some(target) if self.entries.contains_key(target) => Err(RedirectError::Chain {
                from: trimmed.to_string(),
                via: target.clone(),
            }),
            Some(target) => Ok(target.clone()),
        }
    }
}

/// Validates a redirect map against the current dataset.
///
/// Checks, in batch: duplicate keys from the source text, targets that are
/// not current identities, targets tagged with an older generation, chains,
/// self-loops, and missing legacy coverage (every edition whose generation-2
/// or generation-3 hash differs from its current hash must have an entry).
/// Generation-1 coverage needs pre-migration record content and stays with
/// the external migration tooling.
pub fn validate_redirects(
    parsed: &ParsedRedirects,
    editions: &[Value],
    regions: &RegionTable,
) -> Vec<RedirectViolation> {
    let map = &parsed.map;
    let mut violations: Vec<RedirectViolation> = parsed
        .duplicate_keys
        .iter()
        .map(|key| RedirectViolation::DuplicateKey { key: key.clone() })
        .collect();

    let mut current_identities: BTreeSet<String> = BTreeSet::new();
    let mut legacy_pairs: Vec<(String, String)> = Vec::new();

    for (index, edition) in editions.iter().enumerate() {
        let shape = match to_canonical_shape(edition) {
            Ok(shape) => shape,
            Err(_) => {
                violations.push(RedirectViolation::MalformedEdition { index });
                continue;
            }
        };
        let current = match compute_identity_at(Generation::ACTIVE, &shape, regions) {
            Ok(identity) => identity,
            Err(_) => {
                violations.push(RedirectViolation::MalformedEdition { index });
                continue;
            }
        };
        current_identities.insert(current.to_string());
        for legacy_generation in [Generation::V2, Generation::V3] {
            if let Ok(legacy) = compute_identity_at(legacy_generation, &shape, regions) {
                if legacy != current {
                    legacy_pairs.push((legacy.to_string(), current.to_string()));
                }
            }
        }
    }

    for (from, to) in map.iter() {
        if !current_identities.contains(to) {
            violations.push(RedirectViolation::DanglingTarget {
                from: from.to_string(),
                to: to.to_string(),
            });
        }
        if IdentityString::new(to.to_string()).generation() != Some(Generation::ACTIVE) {
            violations.push(RedirectViolation::StaleTarget {
                from: from.to_string(),
                to: to.to_string(),
            });
        }
        if to == from {
            violations.push(RedirectViolation::SelfLoop {
                identity: from.to_string(),
            });
        } else if map.contains(to) {
            violations.push(RedirectViolation::Chain {
                from: from.to_string(),
                via: to.to_string(),
            });
        }
    }

    for (legacy, current) in legacy_pairs {
        if !map.contains(&legacy) {
            violations.push(RedirectViolation::MissingRedirect { legacy, current });
        }
    }

    violations
}
