//! Fallback Matcher: closest display name for an unmatched name query.

use kuma_find_domain::{IdentifierIndex, Suggestion, edit_distance};

/// Return the key of `index` closest to `normalized_query` by edit distance.
///
/// Keys are scanned in first-insertion order and only a strictly smaller
/// distance replaces the current best, so the earliest key wins ties.
/// The result is advisory and never resolves a query.
#[must_use]
pub fn closest_match(index: &IdentifierIndex, normalized_query: &str) -> Option<Suggestion> {
    let mut best: Option<Suggestion> = None;
    for entry in index.entries() {
        let Some(directory) = entry.directories.first() else {
            continue;
        };
        let distance = edit_distance(normalized_query, &entry.key);
        if best.as_ref().is_none_or(|current| distance < current.distance) {
            best = Some(Suggestion {
                name: entry.key.clone(),
                directory: directory.clone(),
                distance,
            });
        }
    }
    best
}
