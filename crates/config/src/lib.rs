//! # kuma-find-config
//!
//! Configuration schema, validation, and the per-service `KEY=VALUE` reader.
//! This crate depends on `domain` and `shared` only.

/// Environment variable parsing and merging.
pub mod env;
/// Config loading helpers (file + env).
pub mod load;
/// Configuration schema types and helpers.
pub mod schema;
/// Per-service configuration file reader.
pub mod service_config;

pub use schema::{
    CURRENT_CONFIG_VERSION, ConfigSchemaError, DEFAULT_MAX_DEPTH, FinderConfig, MAX_DEPTH_MAX,
    MAX_DEPTH_MIN, MaxDepth, ValidatedFinderConfig, parse_finder_config_json,
    parse_finder_config_toml,
};

pub use env::{
    ENV_FLEET_ROOT, ENV_LOG_LEVEL, ENV_MAX_DEPTH, ENV_RESULT_FILE, ENV_VARS, EnvParseError, FinderEnv,
    apply_env_overrides,
};
pub use load::{load_finder_config_from_path, to_pretty_json};
pub use service_config::{ServiceConfig, parse_service_config};

/// Returns the config crate version.
#[must_use]
pub const fn config_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
