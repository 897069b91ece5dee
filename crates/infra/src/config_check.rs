//! Config loading helpers for CLI surfaces.

use crate::InfraResult;
use crate::runtime::{ResolvedFinderConfig, RuntimeDirs, resolve_finder_config};
use kuma_find_config::{FinderEnv, ValidatedFinderConfig, load_finder_config_from_path, to_pretty_json};
use kuma_find_shared::ErrorEnvelope;
use std::collections::BTreeMap;
use std::path::Path;

/// Validated config together with its host-resolved runtime values.
#[derive(Debug, Clone)]
pub struct LoadedFinderConfig {
    /// Config after file and env merging.
    pub validated: ValidatedFinderConfig,
    /// Runtime values derived from it.
    pub resolved: ResolvedFinderConfig,
}

/// Load file + env config and resolve host defaults.
pub fn load_finder_config(
    env: &BTreeMap<String, String>,
    config_path: Option<&Path>,
    dirs: &RuntimeDirs,
    log_level_override: Option<&str>,
) -> InfraResult<LoadedFinderConfig> {
    let env = FinderEnv::from_map(env).map_err(ErrorEnvelope::from)?;
    let validated = load_finder_config_from_path(config_path, &env)?;
    let resolved = resolve_finder_config(&validated, &env, dirs, log_level_override)?;
    Ok(LoadedFinderConfig {
        validated,
        resolved,
    })
}

/// Load and validate the effective config, returning deterministic pretty JSON
/// with the fleet root and result file filled in.
pub fn load_effective_config_json(
    env: &BTreeMap<String, String>,
    config_path: Option<&Path>,
    dirs: &RuntimeDirs,
) -> InfraResult<String> {
    let loaded = load_finder_config(env, config_path, dirs, None)?;
    to_pretty_json(&loaded.resolved.to_finder_config(&loaded.validated))
}
