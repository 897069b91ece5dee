//! Runtime configuration resolution (defaults that depend on the host).

use crate::InfraResult;
use kuma_find_app::IndexerSettings;
use kuma_find_config::{FinderConfig, FinderEnv, ValidatedFinderConfig};
use kuma_find_ports::LogLevel;
use kuma_find_shared::{ErrorCode, ErrorEnvelope};
use std::path::PathBuf;
use std::str::FromStr;

/// Fleet location relative to the operator's home directory.
pub const DEFAULT_FLEET_SUBDIR: &str = "Services/Webcom";
/// Result file name inside the system temp directory.
pub const DEFAULT_RESULT_FILE_NAME: &str = "kuma-find.tmp";
/// Log threshold when nothing else is configured.
pub const DEFAULT_LOG_LEVEL: LogLevel = LogLevel::Warn;

/// Host directories used to fill unset paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeDirs {
    /// Operator home directory, when known.
    pub home: Option<PathBuf>,
    /// System temp directory.
    pub temp_dir: PathBuf,
}

impl RuntimeDirs {
    /// Read `HOME` and the system temp directory from the process.
    #[must_use]
    pub fn from_std_env() -> Self {
        Self {
            home: std::env::var_os("HOME")
                .filter(|value| !value.is_empty())
                .map(PathBuf::from),
            temp_dir: std::env::temp_dir(),
        }
    }
}

/// Fully resolved runtime settings for one lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFinderConfig {
    /// Fleet root to walk.
    pub fleet_root: PathBuf,
    /// Result file for the shell wrapper.
    pub result_file: PathBuf,
    /// Indexer layout settings.
    pub indexer: IndexerSettings,
    /// Structured log threshold.
    pub log_level: LogLevel,
}

impl ResolvedFinderConfig {
    /// Render the resolved values back into a config with every path set.
    #[must_use]
    pub fn to_finder_config(&self, validated: &ValidatedFinderConfig) -> FinderConfig {
        FinderConfig {
            fleet_root: Some(self.fleet_root.clone()),
            result_file: Some(self.result_file.clone()),
            ..FinderConfig::clone(validated)
        }
    }
}

/// Parse a log level name, mapping failures to `config:invalid_log_level`.
pub fn parse_log_level(raw: &str) -> InfraResult<LogLevel> {
    LogLevel::from_str(raw.trim()).map_err(|error| {
        ErrorEnvelope::expected(ErrorCode::new("config", "invalid_log_level"), error.to_string())
            .with_metadata("value", raw.to_owned())
    })
}

/// Fill host-dependent defaults and pick the log level.
///
/// Log level precedence: explicit override (CLI flag), then env, then `warn`.
pub fn resolve_finder_config(
    config: &ValidatedFinderConfig,
    env: &FinderEnv,
    dirs: &RuntimeDirs,
    log_level_override: Option<&str>,
) -> InfraResult<ResolvedFinderConfig> {
    let fleet_root = match (&config.fleet_root, &dirs.home) {
        (Some(root), _) => root.clone(),
        (None, Some(home)) => home.join(DEFAULT_FLEET_SUBDIR),
        (None, None) => {
            return Err(ErrorEnvelope::expected(
                ErrorCode::new("config", "fleet_root_unset"),
                "fleet root is not configured and HOME is not set",
            ));
        },
    };
    let result_file = config
        .result_file
        .clone()
        .unwrap_or_else(|| dirs.temp_dir.join(DEFAULT_RESULT_FILE_NAME));

    let log_level = match log_level_override.or(env.log_level.as_deref()) {
        Some(raw) => parse_log_level(raw)?,
        None => DEFAULT_LOG_LEVEL,
    };

    Ok(ResolvedFinderConfig {
        fleet_root,
        result_file,
        indexer: indexer_settings(config),
        log_level,
    })
}

fn indexer_settings(config: &ValidatedFinderConfig) -> IndexerSettings {
    IndexerSettings {
        max_depth: config.max_depth().get(),
        service_config_file: config.service_config_file.clone(),
        email_key: config.email_key.clone(),
        username_key: config.username_key.clone(),
        marker_dir: config.marker_dir.clone(),
        display_name_file: config.display_name_file.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kuma_find_shared::Result;

    fn dirs() -> RuntimeDirs {
        RuntimeDirs {
            home: Some(PathBuf::from("/home/ops")),
            temp_dir: PathBuf::from("/tmp"),
        }
    }

    fn validated(config: FinderConfig) -> Result<ValidatedFinderConfig> {
        config.validate_and_normalize().map_err(ErrorEnvelope::from)
    }

    #[test]
    fn defaults_come_from_home_and_temp() -> Result<()> {
        let config = validated(FinderConfig::default())?;
        let resolved = resolve_finder_config(&config, &FinderEnv::default(), &dirs(), None)?;

        assert_eq!(resolved.fleet_root, PathBuf::from("/home/ops/Services/Webcom"));
        assert_eq!(resolved.result_file, PathBuf::from("/tmp/kuma-find.tmp"));
        assert_eq!(resolved.indexer, IndexerSettings::default());
        assert_eq!(resolved.log_level, LogLevel::Warn);
        Ok(())
    }

    #[test]
    fn configured_paths_win_over_host_defaults() -> Result<()> {
        let config = validated(FinderConfig {
            fleet_root: Some(PathBuf::from("/srv/webcom")),
            result_file: Some(PathBuf::from("/run/kf.tmp")),
            max_depth: 1,
            ..FinderConfig::default()
        })?;
        let no_home = RuntimeDirs {
            home: None,
            ..dirs()
        };
        let resolved = resolve_finder_config(&config, &FinderEnv::default(), &no_home, None)?;

        assert_eq!(resolved.fleet_root, PathBuf::from("/srv/webcom"));
        assert_eq!(resolved.result_file, PathBuf::from("/run/kf.tmp"));
        assert_eq!(resolved.indexer.max_depth, 1);
        Ok(())
    }

    #[test]
    fn missing_home_without_fleet_root_fails() -> Result<()> {
        let config = validated(FinderConfig::default())?;
        let no_home = RuntimeDirs {
            home: None,
            ..dirs()
        };
        let error = resolve_finder_config(&config, &FinderEnv::default(), &no_home, None).err();
        assert_eq!(
            error.map(|error| error.code),
            Some(ErrorCode::new("config", "fleet_root_unset"))
        );
        Ok(())
    }

    #[test]
    fn flag_log_level_beats_env() -> Result<()> {
        let config = validated(FinderConfig::default())?;
        let env = FinderEnv {
            log_level: Some("error".into()),
            ..FinderEnv::default()
        };

        let from_env = resolve_finder_config(&config, &env, &dirs(), None)?;
        assert_eq!(from_env.log_level, LogLevel::Error);
        let from_flag = resolve_finder_config(&config, &env, &dirs(), Some("debug"))?;
        assert_eq!(from_flag.log_level, LogLevel::Debug);

        let error = resolve_finder_config(&config, &env, &dirs(), Some("loud")).err();
        assert_eq!(
            error.map(|error| error.code),
            Some(ErrorCode::new("config", "invalid_log_level"))
        );
        Ok(())
    }
}
