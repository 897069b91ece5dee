//! Finder configuration schema and validation.

use kuma_find_shared::{BoundedUsize, ErrorCode, ErrorEnvelope};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Current config schema version.
pub const CURRENT_CONFIG_VERSION: u32 = 1;

/// Default walk depth below the fleet root.
pub const DEFAULT_MAX_DEPTH: usize = 3;
/// Smallest accepted walk depth.
pub const MAX_DEPTH_MIN: usize = 0;
/// Largest accepted walk depth.
pub const MAX_DEPTH_MAX: usize = 16;

/// Default per-service configuration file name.
pub const DEFAULT_SERVICE_CONFIG_FILE: &str = ".env";
/// Default key holding comma-separated notification emails.
pub const DEFAULT_EMAIL_KEY: &str = "MAIL_TO";
/// Default key holding the declared username.
pub const DEFAULT_USERNAME_KEY: &str = "USERNAME";
/// Default marker directory name.
pub const DEFAULT_MARKER_DIR: &str = "kuma";
/// Default display-name file inside the marker directory.
pub const DEFAULT_DISPLAY_NAME_FILE: &str = "name";

/// Validated walk depth.
pub type MaxDepth = BoundedUsize<MAX_DEPTH_MIN, MAX_DEPTH_MAX>;

/// Top-level finder configuration.
///
/// Unset paths are resolved by the composition root (home and temp dirs).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct FinderConfig {
    /// Schema version for forward-compatible migrations.
    pub version: u32,
    /// Fleet root directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fleet_root: Option<PathBuf>,
    /// Result file read by the shell wrapper.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_file: Option<PathBuf>,
    /// Walk depth bound (root = 0).
    pub max_depth: usize,
    /// Per-service configuration file name.
    pub service_config_file: Box<str>,
    /// Key with comma-separated notification emails.
    pub email_key: Box<str>,
    /// Key with the declared username.
    pub username_key: Box<str>,
    /// Marker directory name.
    pub marker_dir: Box<str>,
    /// Display-name file inside the marker directory.
    pub display_name_file: Box<str>,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            version: CURRENT_CONFIG_VERSION,
            fleet_root: None,
            result_file: None,
            max_depth: DEFAULT_MAX_DEPTH,
            service_config_file: DEFAULT_SERVICE_CONFIG_FILE.into(),
            email_key: DEFAULT_EMAIL_KEY.into(),
            username_key: DEFAULT_USERNAME_KEY.into(),
            marker_dir: DEFAULT_MARKER_DIR.into(),
            display_name_file: DEFAULT_DISPLAY_NAME_FILE.into(),
        }
    }
}

impl FinderConfig {
    /// Validate and normalize the config.
    pub fn validate_and_normalize(mut self) -> Result<ValidatedFinderConfig, ConfigSchemaError> {
        if self.version != CURRENT_CONFIG_VERSION {
            return Err(ConfigSchemaError::UnsupportedVersion {
                found: self.version,
                supported: CURRENT_CONFIG_VERSION,
            });
        }

        let max_depth =
            MaxDepth::try_new(self.max_depth).map_err(|error| ConfigSchemaError::MaxDepthOutOfRange {
                value: error.value,
                min: error.min,
                max: error.max,
            })?;

        self.service_config_file = single_segment("serviceConfigFile", &self.service_config_file)?;
        self.marker_dir = single_segment("markerDir", &self.marker_dir)?;
        self.display_name_file = single_segment("displayNameFile", &self.display_name_file)?;
        self.email_key = config_key("emailKey", &self.email_key)?;
        self.username_key = config_key("usernameKey", &self.username_key)?;

        for (field, path) in [
            ("fleetRoot", self.fleet_root.as_ref()),
            ("resultFile", self.result_file.as_ref()),
        ] {
            if path.is_some_and(|path| path.as_os_str().is_empty()) {
                return Err(ConfigSchemaError::EmptyPath { field });
            }
        }

        Ok(ValidatedFinderConfig {
            raw: self,
            max_depth,
        })
    }
}

fn single_segment(field: &'static str, value: &str) -> Result<Box<str>, ConfigSchemaError> {
    let trimmed = value.trim();
    let valid = !trimmed.is_empty()
        && trimmed != "."
        && trimmed != ".."
        && !trimmed.contains(['/', '\\']);
    if valid {
        Ok(trimmed.into())
    } else {
        Err(ConfigSchemaError::InvalidFileName {
            field,
            value: value.to_owned(),
        })
    }
}

fn config_key(field: &'static str, value: &str) -> Result<Box<str>, ConfigSchemaError> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.contains('=') {
        return Err(ConfigSchemaError::InvalidKey {
            field,
            value: value.to_owned(),
        });
    }
    Ok(trimmed.into())
}

/// Validated config wrapper carrying bounded numeric values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedFinderConfig {
    raw: FinderConfig,
    max_depth: MaxDepth,
}

impl ValidatedFinderConfig {
    /// Validated walk depth.
    #[must_use]
    pub const fn max_depth(&self) -> MaxDepth {
        self.max_depth
    }

    /// Consume the wrapper and return the raw config.
    #[must_use]
    pub fn into_inner(self) -> FinderConfig {
        self.raw
    }
}

impl std::ops::Deref for ValidatedFinderConfig {
    type Target = FinderConfig;

    fn deref(&self) -> &Self::Target {
        &self.raw
    }
}

impl AsRef<FinderConfig> for ValidatedFinderConfig {
    fn as_ref(&self) -> &FinderConfig {
        &self.raw
    }
}

/// Schema validation failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigSchemaError {
    /// The config version is not supported by this binary.
    #[error("config version {found} is not supported (expected {supported})")]
    UnsupportedVersion {
        /// Version found in the config.
        found: u32,
        /// Version supported by this crate.
        supported: u32,
    },
    /// The walk depth is out of bounds.
    #[error("maxDepth must be within [{min}, {max}] (got {value})")]
    MaxDepthOutOfRange {
        /// Value provided.
        value: usize,
        /// Minimum allowed value.
        min: usize,
        /// Maximum allowed value.
        max: usize,
    },
    /// A file or directory name is not a single path segment.
    #[error("{field} must be a single, non-empty path segment")]
    InvalidFileName {
        /// Field name in the config file.
        field: &'static str,
        /// Value provided.
        value: String,
    },
    /// A service configuration key is unusable.
    #[error("{field} must be non-empty and must not contain `=`")]
    InvalidKey {
        /// Field name in the config file.
        field: &'static str,
        /// Value provided.
        value: String,
    },
    /// A path field is present but empty.
    #[error("{field} must not be empty")]
    EmptyPath {
        /// Field name in the config file.
        field: &'static str,
    },
}

impl ConfigSchemaError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::UnsupportedVersion { .. } => ErrorCode::new("config", "unsupported_version"),
            Self::MaxDepthOutOfRange { .. } => ErrorCode::new("config", "max_depth_out_of_range"),
            Self::InvalidFileName { .. } => ErrorCode::new("config", "invalid_file_name"),
            Self::InvalidKey { .. } => ErrorCode::new("config", "invalid_key"),
            Self::EmptyPath { .. } => ErrorCode::new("config", "empty_path"),
        }
    }
}

impl From<ConfigSchemaError> for ErrorEnvelope {
    fn from(error: ConfigSchemaError) -> Self {
        let code = error.error_code();
        let message = error.to_string();
        let envelope = Self::expected(code, message);

        match error {
            ConfigSchemaError::UnsupportedVersion { found, supported } => envelope
                .with_metadata("found", found.to_string())
                .with_metadata("supported", supported.to_string()),
            ConfigSchemaError::MaxDepthOutOfRange { value, min, max } => envelope
                .with_metadata("field", "maxDepth")
                .with_metadata("value", value.to_string())
                .with_metadata("min", min.to_string())
                .with_metadata("max", max.to_string()),
            ConfigSchemaError::InvalidFileName { field, value }
            | ConfigSchemaError::InvalidKey { field, value } => envelope
                .with_metadata("field", field)
                .with_metadata("value", value),
            ConfigSchemaError::EmptyPath { field } => envelope.with_metadata("field", field),
        }
    }
}

/// Parse a finder config from a JSON string, applying validation and normalization.
pub fn parse_finder_config_json(input: &str) -> Result<ValidatedFinderConfig, ErrorEnvelope> {
    let config: FinderConfig = serde_json::from_str(input).map_err(|error| {
        ErrorEnvelope::expected(
            ErrorCode::new("config", "invalid_json"),
            format!("invalid config JSON: {error}"),
        )
    })?;

    config.validate_and_normalize().map_err(Into::into)
}

/// Parse a finder config from a TOML string, applying validation and normalization.
pub fn parse_finder_config_toml(input: &str) -> Result<ValidatedFinderConfig, ErrorEnvelope> {
    let config: FinderConfig = toml::from_str(input).map_err(|error| {
        ErrorEnvelope::expected(
            ErrorCode::new("config", "invalid_toml"),
            format!("invalid config TOML: {error}"),
        )
    })?;

    config.validate_and_normalize().map_err(Into::into)
}
