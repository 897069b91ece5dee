//! # kuma-find-ports
//!
//! Port traits for the kuma-find hexagonal architecture.
//!
//! This crate defines the interfaces between the domain and infrastructure
//! layers. It depends only on `shared`. Every port is synchronous:
//! a lookup is a single short-lived run with one blocking suspend point (the
//! selection prompt).

/// Returns the ports crate version.
#[must_use]
pub const fn ports_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

pub mod filesystem;
pub mod logger;
pub mod prompt;
pub mod sink;

pub use filesystem::*;
pub use logger::*;
pub use prompt::*;
pub use sink::*;
