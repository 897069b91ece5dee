//! # kuma-find-domain
//!
//! Domain entities and pure decision logic for resolving a service directory.
//!
//! This crate contains the core domain model with no infrastructure dependencies:
//!
//! - **Identifiers** - `IdentifierKind`, query classification and normalization
//! - **Directories** - `ServiceDirectory`, the underscore convention
//! - **Indices** - `IdentifierIndex`, `FleetIndices`
//! - **Resolution** - `Resolution`, `Suggestion`, two-way tie-break
//! - **Distance** - edit distance used by the fallback matcher
//!
//! ## Dependency Rules
//!
//! - Depends only on `shared` crate
//! - No infrastructure or adapter dependencies
//! - Pure domain logic with no I/O

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

// Re-export shared types for convenience
pub use kuma_find_shared::shared_crate_version;

// =============================================================================
// DOMAIN MODULES
// =============================================================================

pub mod directory;
pub mod distance;
pub mod identifier;
pub mod index;
pub mod resolution;

pub use directory::{DEPRECATED_PREFIX, ServiceDirectory, is_deprecated_dir};
pub use distance::edit_distance;
pub use identifier::{IdentifierKind, classify_query, normalize_identifier, normalize_query};
pub use index::{FleetIndices, IdentifierIndex, IndexEntry};
pub use resolution::{AbortReason, Resolution, Suggestion, TieBreak, break_underscore_tie};

/// Returns the domain crate version.
#[must_use]
pub const fn domain_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
