//! # kuma-find-infra
//!
//! Infrastructure wiring and runtime composition.
//! This crate depends on `app`, `adapters`, `config`, `ports`, and `shared`.

/// Local CLI orchestration helpers.
pub mod cli_local;
/// Config loading helpers used by CLI surfaces.
pub mod config_check;
/// Host-dependent config resolution.
pub mod runtime;
/// Shell wrapper snippet.
pub mod shell_init;

use kuma_find_shared::ErrorEnvelope;

/// Infra-level error type (shared error envelope).
pub type InfraError = ErrorEnvelope;

/// Infra-level result type.
pub type InfraResult<T> = Result<T, InfraError>;

pub use cli_local::{
    FindReport, FindRequest, build_logger, resolve_result_file, run_find_local, run_find_with,
    std_env_map,
};
pub use config_check::{LoadedFinderConfig, load_effective_config_json, load_finder_config};
pub use runtime::{
    DEFAULT_FLEET_SUBDIR, DEFAULT_LOG_LEVEL, DEFAULT_RESULT_FILE_NAME, ResolvedFinderConfig,
    RuntimeDirs, parse_log_level, resolve_finder_config,
};
pub use shell_init::{SHELL_FUNCTION_NAME, shell_init_snippet, shell_quote};

/// Crate metadata.
pub mod placeholder {
    /// Crate version, used by the binary's `--version` output.
    #[must_use]
    pub const fn infra_crate_version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }
}

pub use placeholder::infra_crate_version;

#[cfg(test)]
mod tests {
    use super::*;
    use kuma_find_adapters::adapters_crate_version;
    use kuma_find_app::app_crate_version;
    use kuma_find_config::config_crate_version;
    use kuma_find_shared::shared_crate_version;

    fn workspace_deps() -> Vec<String> {
        let cargo_toml = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/Cargo.toml"));
        let mut deps = Vec::new();
        let mut in_deps = false;
        let mut in_dev_deps = false;

        for raw_line in cargo_toml.lines() {
            let line = raw_line.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }
            if line.starts_with('[') {
                in_deps = line == "[dependencies]";
                in_dev_deps = line == "[dev-dependencies]";
                continue;
            }
            if !(in_deps || in_dev_deps) {
                continue;
            }
            if line.starts_with("kuma-find-") {
                let key = line.split('=').next().unwrap_or("").trim();
                let name = key.split('.').next().unwrap_or("").trim();
                deps.push(name.to_owned());
            }
        }

        deps
    }

    #[test]
    fn infra_depends_on_app_adapters_config() {
        let deps = workspace_deps();
        for expected in ["kuma-find-app", "kuma-find-adapters", "kuma-find-config"] {
            assert!(
                deps.iter().any(|dep| dep == expected),
                "missing dependency: {expected}"
            );
        }
    }

    #[test]
    fn infra_can_use_app_adapters_config_shared() {
        assert!(!infra_crate_version().is_empty());
        assert!(!app_crate_version().is_empty());
        assert!(!adapters_crate_version().is_empty());
        assert!(!config_crate_version().is_empty());
        assert!(!shared_crate_version().is_empty());
    }
}
