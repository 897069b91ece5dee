//! Query classification and identifier normalization.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The identifier family a raw query is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IdentifierKind {
    /// Notification email address declared in service configuration.
    Email,
    /// Numeric username declared in service configuration.
    Username,
    /// Display name from the marker directory.
    Name,
}

impl IdentifierKind {
    /// Stable lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Username => "username",
            Self::Name => "name",
        }
    }
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Classify a raw query.
///
/// Rules, in order: contains `@` is an email, a leading decimal digit is a
/// username, anything else (including the empty string) is a display name.
/// This is a heuristic and accepts arbitrary input.
#[must_use]
pub fn classify_query(query: &str) -> IdentifierKind {
    if query.contains('@') {
        IdentifierKind::Email
    } else if query.chars().next().is_some_and(|ch| ch.is_ascii_digit()) {
        IdentifierKind::Username
    } else {
        IdentifierKind::Name
    }
}

/// Normalize a query for lookup (lower-cased, otherwise untouched).
#[must_use]
pub fn normalize_query(query: &str) -> String {
    query.to_lowercase()
}

/// Normalize an identifier read from disk (trimmed, lower-cased).
///
/// Returns `None` when nothing is left after trimming.
#[must_use]
pub fn normalize_identifier(raw: &str) -> Option<Box<str>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase().into_boxed_str())
    }
}
