//! Identifier indices rebuilt on every run.
//!
//! An index maps a normalized identifier to every directory declaring it.
//! Collisions are expected (live service next to its `_`-prefixed predecessor)
//! and are preserved in discovery order.

use crate::directory::ServiceDirectory;
use crate::identifier::{IdentifierKind, normalize_identifier};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// One key of an identifier index with its directories in discovery order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    /// Normalized identifier.
    pub key: Box<str>,
    /// Directories sharing the identifier.
    pub directories: Vec<PathBuf>,
}

/// Insertion-ordered map from normalized identifier to directories.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentifierIndex {
    entries: Vec<IndexEntry>,
    positions: HashMap<Box<str>, usize>,
}

impl IdentifierIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `directory` under the normalized form of `raw_key`.
    ///
    /// Returns false when the key is blank or the pair is already present.
    pub fn insert(&mut self, raw_key: &str, directory: &Path) -> bool {
        let Some(key) = normalize_identifier(raw_key) else {
            return false;
        };

        if let Some(entry) = self
            .positions
            .get(&key)
            .and_then(|position| self.entries.get_mut(*position))
        {
            if entry.directories.iter().any(|existing| existing == directory) {
                return false;
            }
            entry.directories.push(directory.to_path_buf());
            return true;
        }

        self.positions.insert(key.clone(), self.entries.len());
        self.entries.push(IndexEntry {
            key,
            directories: vec![directory.to_path_buf()],
        });
        true
    }

    /// Look up an already-normalized query.
    #[must_use]
    pub fn lookup(&self, normalized_query: &str) -> &[PathBuf] {
        self.positions
            .get(normalized_query)
            .and_then(|position| self.entries.get(*position))
            .map(|entry| entry.directories.as_slice())
            .unwrap_or_default()
    }

    /// Iterate entries in first-insertion order.
    pub fn entries(&self) -> impl Iterator<Item = &IndexEntry> {
        self.entries.iter()
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when no key is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The three independent indices built from one fleet scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FleetIndices {
    /// Email address to directories.
    pub email: IdentifierIndex,
    /// Username to directories.
    pub username: IdentifierIndex,
    /// Display name to directories.
    pub name: IdentifierIndex,
}

impl FleetIndices {
    /// Build all indices from directories in discovery order.
    #[must_use]
    pub fn from_directories(directories: &[ServiceDirectory]) -> Self {
        let mut indices = Self::default();
        for directory in directories {
            indices.register(directory);
        }
        indices
    }

    /// Register every identifier a directory declares.
    pub fn register(&mut self, directory: &ServiceDirectory) {
        for email in &directory.declared_emails {
            self.email.insert(email, &directory.path);
        }
        if let Some(username) = directory.declared_username.as_deref() {
            self.username.insert(username, &directory.path);
        }
        if let Some(name) = directory.display_name.as_deref() {
            self.name.insert(name, &directory.path);
        }
    }

    /// Select the index matching a query kind.
    #[must_use]
    pub const fn for_kind(&self, kind: IdentifierKind) -> &IdentifierIndex {
        match kind {
            IdentifierKind::Email => &self.email,
            IdentifierKind::Username => &self.username,
            IdentifierKind::Name => &self.name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_normalizes_and_keeps_collisions_in_order() {
        let mut index = IdentifierIndex::new();
        assert!(index.insert(" Ops ", Path::new("/fleet/_old-ops")));
        assert!(index.insert("OPS", Path::new("/fleet/ops")));
        assert!(!index.insert("ops", Path::new("/fleet/ops")));
        assert!(!index.insert("   ", Path::new("/fleet/blank")));

        assert_eq!(
            index.lookup("ops"),
            &[PathBuf::from("/fleet/_old-ops"), PathBuf::from("/fleet/ops")]
        );
        assert!(index.lookup("OPS").is_empty());
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn entries_iterate_in_first_insertion_order() {
        let mut index = IdentifierIndex::new();
        index.insert("zeta", Path::new("/fleet/z"));
        index.insert("alpha", Path::new("/fleet/a"));
        index.insert("zeta", Path::new("/fleet/z2"));

        let keys: Vec<&str> = index.entries().map(|entry| entry.key.as_ref()).collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
    }

    #[test]
    fn fleet_indices_route_by_kind() {
        let directory = ServiceDirectory {
            path: PathBuf::from("/fleet/alice"),
            display_name: Some("Alice Jansen".into()),
            declared_emails: vec!["alice@example.com".into(), "ops@example.com".into()],
            declared_username: Some("1234567".into()),
        };
        let indices = FleetIndices::from_directories(&[directory]);

        assert_eq!(indices.for_kind(IdentifierKind::Email).len(), 2);
        assert_eq!(
            indices.for_kind(IdentifierKind::Username).lookup("1234567"),
            &[PathBuf::from("/fleet/alice")]
        );
        assert_eq!(
            indices.for_kind(IdentifierKind::Name).lookup("alice jansen"),
            &[PathBuf::from("/fleet/alice")]
        );
    }
}
