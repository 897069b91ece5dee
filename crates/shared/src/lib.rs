//! # kuma-find-shared
//!
//! Shared result types and error handling for the kuma-find workspace.
//!
//! This crate provides foundational types that are used across all other crates:
//!
//! - Result and error envelope types
//! - Bounded numeric wrappers for validated config values
//! - Redaction helpers for log fields
//!
//! ## Design Principles
//!
//! 1. **No workspace dependencies** - This crate only depends on external crates
//! 2. **Serde-compatible** - Error envelopes can be rendered as JSON

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod errors;
pub mod invariants;
pub mod redaction;
pub mod result;

pub use errors::{
    ErrorCode, ErrorEnvelope, ErrorKind, ErrorMetadata, UnexpectedError,
    normalize_unexpected_error,
};
pub use invariants::{BoundedUsize, BoundsError};
pub use redaction::{REDACTED, is_sensitive_key, redact_if_sensitive};
pub use result::Result;

/// Returns the shared crate version.
#[must_use]
pub const fn shared_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
