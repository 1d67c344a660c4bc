//! Frozen scalar normalizers.
//!
//! Both functions here are FROZEN: at least one shipped hash generation
//! depends on their exact output, so changing them silently invalidates
//! every historical hash used for redirect migration. Any behavior change
//! requires a new, explicitly versioned variant with the old function kept
//! under a distinct name for legacy recomputation. The snapshot tests in
//! `canonpack-core/tests/legacy_snapshot.rs` guard this.

use regex::Regex;

/// Normalizes a product code: trim, drop whitespace/hyphens, keep digits only.
///
/// Returns the empty string when no digits remain. Leading zeros are
/// preserved. No length validation; callers decide whether to treat the
/// empty result as "absent".
pub fn normalize_product_code(raw: &str) -> String {
    raw.trim().chars().filter(char::is_ascii_digit).collect()
}

/// Normalizes a classification tag.
///
/// Trim, lowercase, collapse runs of whitespace/hyphens (and of resulting
/// underscores) to a single underscore, strip leading/trailing underscores:
/// `"Director Cut"`, `"director-cut"`, and `"director_cut"` all normalize
/// to `"director_cut"`.
pub fn normalize_tag(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    let separators = Regex::new(r"[\s\-]+").expect("invalid regex");
    let underscores = Regex::new(r"_+").expect("invalid regex");
    let collapsed = separators.replace_all(&lowered, "_");
    let collapsed = underscores.replace_all(&collapsed, "_");
    collapsed.trim_matches('_').to_string()
}
