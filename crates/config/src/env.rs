//! Environment variable parsing and env-to-config merging.
//!
//! Env parsing is strict: a variable that is present must carry a usable
//! value, otherwise the run fails before touching the fleet.

use crate::schema::{FinderConfig, ValidatedFinderConfig};
use kuma_find_shared::{ErrorCode, ErrorEnvelope, redact_if_sensitive};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Env var: fleet root override.
pub const ENV_FLEET_ROOT: &str = "KUMA_FIND_FLEET_ROOT";
/// Env var: result file override.
pub const ENV_RESULT_FILE: &str = "KUMA_FIND_RESULT_FILE";
/// Env var: walk depth override.
pub const ENV_MAX_DEPTH: &str = "KUMA_FIND_MAX_DEPTH";
/// Env var: structured log threshold.
pub const ENV_LOG_LEVEL: &str = "KUMA_FIND_LOG_LEVEL";

/// Every env var read by the finder.
pub const ENV_VARS: [&str; 4] = [ENV_FLEET_ROOT, ENV_RESULT_FILE, ENV_MAX_DEPTH, ENV_LOG_LEVEL];

/// Env overrides parsed from a key/value map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FinderEnv {
    /// `KUMA_FIND_FLEET_ROOT`.
    pub fleet_root: Option<PathBuf>,
    /// `KUMA_FIND_RESULT_FILE`.
    pub result_file: Option<PathBuf>,
    /// `KUMA_FIND_MAX_DEPTH`.
    pub max_depth: Option<usize>,
    /// `KUMA_FIND_LOG_LEVEL`, unparsed (the logger owns the level vocabulary).
    pub log_level: Option<Box<str>>,
}

impl FinderEnv {
    /// Parse env overrides from a key/value map (useful for tests and fixtures).
    pub fn from_map(map: &BTreeMap<String, String>) -> Result<Self, EnvParseError> {
        Ok(Self {
            fleet_root: parse_optional_trimmed_string(map, ENV_FLEET_ROOT)?
                .map(|value| PathBuf::from(value.as_ref())),
            result_file: parse_optional_trimmed_string(map, ENV_RESULT_FILE)?
                .map(|value| PathBuf::from(value.as_ref())),
            max_depth: parse_optional_usize(map, ENV_MAX_DEPTH)?,
            log_level: parse_optional_trimmed_string(map, ENV_LOG_LEVEL)?,
        })
    }
}

/// Apply env overrides on top of a config and validate the result.
pub fn apply_env_overrides(
    mut config: FinderConfig,
    env: &FinderEnv,
) -> Result<ValidatedFinderConfig, ErrorEnvelope> {
    if let Some(fleet_root) = env.fleet_root.as_ref() {
        config.fleet_root = Some(fleet_root.clone());
    }
    if let Some(result_file) = env.result_file.as_ref() {
        config.result_file = Some(result_file.clone());
    }
    if let Some(max_depth) = env.max_depth {
        config.max_depth = max_depth;
    }

    config.validate_and_normalize().map_err(Into::into)
}

/// Validation failures when parsing env variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvParseError {
    /// An env var was present but empty after trimming.
    EmptyValue {
        /// Env var name.
        var: &'static str,
    },
    /// Integer env var had an invalid value.
    InvalidInt {
        /// Env var name.
        var: &'static str,
        /// Raw input value.
        value: String,
    },
}

impl EnvParseError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::EmptyValue { .. } => ErrorCode::new("config", "empty_env_var"),
            Self::InvalidInt { .. } => ErrorCode::new("config", "invalid_env_int"),
        }
    }
}

impl fmt::Display for EnvParseError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyValue { var } => write!(formatter, "{var} must be non-empty"),
            Self::InvalidInt { var, .. } => {
                write!(formatter, "{var} must be a non-negative integer")
            },
        }
    }
}

impl std::error::Error for EnvParseError {}

impl From<EnvParseError> for ErrorEnvelope {
    fn from(error: EnvParseError) -> Self {
        let code = error.error_code();
        let message = error.to_string();
        let envelope = Self::expected(code, message);

        match error {
            EnvParseError::EmptyValue { var } => envelope.with_metadata("env_var", var),
            EnvParseError::InvalidInt { var, value } => envelope
                .with_metadata("env_var", var)
                .with_metadata("value", redact_if_sensitive(var, &value)),
        }
    }
}

fn parse_optional_trimmed_string(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<Box<str>>, EnvParseError> {
    let Some(raw) = map.get(var) else {
        return Ok(None);
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EnvParseError::EmptyValue { var });
    }

    Ok(Some(trimmed.to_owned().into_boxed_str()))
}

fn parse_optional_usize(
    map: &BTreeMap<String, String>,
    var: &'static str,
) -> Result<Option<usize>, EnvParseError> {
    let Some(raw) = map.get(var) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EnvParseError::EmptyValue { var });
    }

    trimmed
        .parse::<usize>()
        .map(Some)
        .map_err(|_| EnvParseError::InvalidInt {
            var,
            value: raw.clone(),
        })
}
