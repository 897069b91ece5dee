//! Resolution outcomes and the two-way underscore tie-break.

use crate::directory::is_deprecated_dir;
use std::path::{Path, PathBuf};

/// Result of applying the underscore convention to a candidate list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TieBreak {
    /// Exactly one of two candidates was deprecated; the other one wins.
    Selected {
        /// Live directory.
        selected: PathBuf,
        /// Deprecated directory that was ignored.
        discarded: PathBuf,
    },
    /// The convention does not decide; a human has to choose.
    Undecided,
}

/// Apply the underscore tie-break.
///
/// Only a pair where exactly one leaf name starts with `_` is decided. Any other
/// candidate count, or a pair where both or neither carry the prefix, is
/// `Undecided`.
#[must_use]
pub fn break_underscore_tie(candidates: &[PathBuf]) -> TieBreak {
    let [first, second] = candidates else {
        return TieBreak::Undecided;
    };

    match (is_deprecated_dir(first), is_deprecated_dir(second)) {
        (true, false) => TieBreak::Selected {
            selected: second.clone(),
            discarded: first.clone(),
        },
        (false, true) => TieBreak::Selected {
            selected: first.clone(),
            discarded: second.clone(),
        },
        _ => TieBreak::Undecided,
    }
}

/// Closest display name offered when a name query has no exact match.
///
/// Advisory only: it is shown to the operator and never resolves the query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    /// Normalized display name that was closest.
    pub name: Box<str>,
    /// First directory registered under that name.
    pub directory: PathBuf,
    /// Edit distance between the query and `name`.
    pub distance: usize,
}

/// Why disambiguation produced no directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbortReason {
    /// The operator typed something that is not an in-range menu number.
    InvalidChoice {
        /// Raw line as typed.
        input: Box<str>,
    },
    /// Input ended before a line was read.
    EndOfInput,
    /// Prompting was disabled for this run.
    NonInteractive,
}

/// Outcome of resolving one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Exactly one directory matched.
    Found {
        /// Matched directory.
        directory: PathBuf,
    },
    /// Two directories matched and the underscore convention picked one.
    AutoSelected {
        /// Live directory.
        directory: PathBuf,
        /// Deprecated duplicate that was ignored.
        discarded: PathBuf,
    },
    /// The operator chose from the numbered menu.
    Picked {
        /// Chosen directory.
        directory: PathBuf,
        /// One-based menu position that was chosen.
        choice: usize,
        /// Number of candidates on the menu.
        candidates: usize,
    },
    /// Disambiguation was needed but produced no valid choice.
    Aborted {
        /// Candidates that were (or would have been) offered.
        candidates: Vec<PathBuf>,
        /// What ended the disambiguation.
        reason: AbortReason,
    },
    /// Nothing matched in the selected index.
    NoMatch {
        /// Closest display name (name queries only).
        suggestion: Option<Suggestion>,
    },
}

impl Resolution {
    /// The resolved directory, when there is one.
    #[must_use]
    pub fn directory(&self) -> Option<&Path> {
        match self {
            Self::Found { directory }
            | Self::AutoSelected { directory, .. }
            | Self::Picked { directory, .. } => Some(directory),
            Self::Aborted { .. } | Self::NoMatch { .. } => None,
        }
    }

    /// Returns true when exactly one directory was resolved.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.directory().is_some()
    }

    /// Stable label for logs and machine output.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Found { .. } => "found",
            Self::AutoSelected { .. } => "auto_selected",
            Self::Picked { .. } => "picked",
            Self::Aborted { .. } => "aborted",
            Self::NoMatch { .. } => "no_match",
        }
    }
}
