//! Edit distance used by the fallback matcher.

/// Levenshtein distance with unit costs, computed over Unicode scalar values.
#[must_use]
pub fn edit_distance(left: &str, right: &str) -> usize {
    strsim::levenshtein(left, right)
}
