//! # kuma-find-app
//!
//! Application use cases: fleet indexing, query resolution and the
//! find-service orchestration.
//! This crate depends on `ports`, `domain`, `config`, and `shared`.

pub mod build_indices;
pub mod fallback;
pub mod find_service;
pub mod resolve;

/// Crate metadata.
pub mod placeholder {
    /// Crate version, used by the binary's `--version` output and tests.
    #[must_use]
    pub const fn app_crate_version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }
}

pub use build_indices::{
    BuildIndicesDeps, BuildIndicesInput, FleetScan, FleetScanStats, IndexError, IndexerSettings,
    build_fleet_indices,
};
pub use fallback::closest_match;
pub use find_service::{FindServiceDeps, FindServiceInput, FindServiceOutput, find_service};
pub use placeholder::app_crate_version;
pub use resolve::{parse_menu_choice, resolve_query};
