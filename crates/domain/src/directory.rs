//! Service directories discovered in the fleet.

use std::path::{Path, PathBuf};

/// Leaf-name prefix marking a deprecated or disabled duplicate.
pub const DEPRECATED_PREFIX: char = '_';

/// One managed service instance, as read from disk during a single run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDirectory {
    /// Absolute directory path (identity).
    pub path: PathBuf,
    /// Normalized display name from the marker directory.
    pub display_name: Option<Box<str>>,
    /// Normalized notification emails, deduplicated, in declaration order.
    pub declared_emails: Vec<Box<str>>,
    /// Normalized username declared in the service configuration.
    pub declared_username: Option<Box<str>>,
}

impl ServiceDirectory {
    /// Create a directory record with no declared identifiers.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self {
            path,
            display_name: None,
            declared_emails: Vec::new(),
            declared_username: None,
        }
    }

    /// Returns true when the directory follows the underscore convention.
    #[must_use]
    pub fn is_deprecated(&self) -> bool {
        is_deprecated_dir(&self.path)
    }

    /// Returns true when the directory declares nothing indexable.
    #[must_use]
    pub fn has_no_identifiers(&self) -> bool {
        self.display_name.is_none()
            && self.declared_emails.is_empty()
            && self.declared_username.is_none()
    }
}

/// Returns true when the leaf name of `path` starts with `_`.
#[must_use]
pub fn is_deprecated_dir(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|name| name.to_string_lossy().starts_with(DEPRECATED_PREFIX))
}
