//! File configuration for harvest defaults.
//!
//! A TOML file may set any subset of the fields of [`HarvestConfig`]; the
//! rest keep their defaults. Command-line flags are applied on top by the
//! binary.
//!
//! ```toml
//! seeds = ["https://www.cascorp.com/us/en/msds"]
//! base_domain = "https://webcdnprd.cascorp.com"
//! output_dir = "PDFs"
//! concurrency = 4
//! filename_style = "legacy"
//! ```

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::download::{
    CONNECT_TIMEOUT_SECS, DEFAULT_CONCURRENCY, FilenameStyle, MAX_CONCURRENCY, MIN_CONCURRENCY,
    REQUEST_TIMEOUT_SECS,
};

/// Directory name under the user config directory.
const APP_DIR: &str = "pdf-harvester";
const CONFIG_FILE: &str = "config.toml";

const DEFAULT_SEED: &str = "https://www.cascorp.com/us/en/msds";
const DEFAULT_BASE_DOMAIN: &str = "https://webcdnprd.cascorp.com";
const DEFAULT_OUTPUT_DIR: &str = "PDFs";

const MAX_TIMEOUT_SECS: u64 = 3600;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML or has unknown or mistyped keys.
    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A value is outside its accepted range.
    #[error("invalid config value for `{field}`: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

impl ConfigError {
    fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            message: message.into(),
        }
    }
}

/// Settings for one harvesting run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HarvestConfig {
    /// Pages scanned for PDF links.
    pub seeds: Vec<String>,
    /// Prefix joined onto links without a host.
    pub base_domain: String,
    /// Directory receiving downloaded documents.
    pub output_dir: PathBuf,
    /// Maximum concurrent downloads (1..=100).
    pub concurrency: usize,
    /// TCP connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Overall per-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// How destination filenames are derived.
    pub filename_style: FilenameStyle,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            seeds: vec![DEFAULT_SEED.to_string()],
            base_domain: DEFAULT_BASE_DOMAIN.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            concurrency: DEFAULT_CONCURRENCY,
            connect_timeout_secs: CONNECT_TIMEOUT_SECS,
            request_timeout_secs: REQUEST_TIMEOUT_SECS,
            filename_style: FilenameStyle::default(),
        }
    }
}

impl HarvestConfig {
    /// Checks every value against its accepted range.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_CONCURRENCY..=MAX_CONCURRENCY).contains(&self.concurrency) {
            return Err(ConfigError::invalid(
                "concurrency",
                format!(
                    "{}. Expected range: {MIN_CONCURRENCY}..={MAX_CONCURRENCY}",
                    self.concurrency
                ),
            ));
        }
        validate_timeout_secs("connect_timeout_secs", self.connect_timeout_secs)?;
        validate_timeout_secs("request_timeout_secs", self.request_timeout_secs)?;
        if self.base_domain.trim().is_empty() {
            return Err(ConfigError::invalid("base_domain", "must not be empty"));
        }
        Ok(())
    }
}

fn validate_timeout_secs(field: &'static str, value: u64) -> Result<(), ConfigError> {
    if !(1..=MAX_TIMEOUT_SECS).contains(&value) {
        return Err(ConfigError::invalid(
            field,
            format!("{value}. Expected range: 1..={MAX_TIMEOUT_SECS}"),
        ));
    }
    Ok(())
}

/// Resolves the default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/pdf-harvester/config.toml`
/// 2. `$HOME/.config/pdf-harvester/config.toml`
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    config_path_from(
        env_var_non_empty_os("XDG_CONFIG_HOME"),
        env_var_non_empty_os("HOME"),
    )
}

fn config_path_from(xdg_config_home: Option<OsString>, home: Option<OsString>) -> Option<PathBuf> {
    if let Some(xdg) = xdg_config_home {
        return Some(PathBuf::from(xdg).join(APP_DIR).join(CONFIG_FILE));
    }
    let home = home?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join(APP_DIR)
            .join(CONFIG_FILE),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Loads and validates the config file at `path`.
///
/// # Errors
///
/// Returns [`ConfigError::Read`] if the file cannot be read,
/// [`ConfigError::Parse`] for malformed TOML, and [`ConfigError::Invalid`]
/// when a value is out of range.
pub fn load_config(path: &Path) -> Result<HarvestConfig, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_config_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    config.validate()?;
    debug!(path = %path.display(), "loaded config file");
    Ok(config)
}

/// Loads the config at the default path, or defaults when there is none.
///
/// # Errors
///
/// Same as [`load_config`] once a file is present.
pub fn load_default_config() -> Result<HarvestConfig, ConfigError> {
    match resolve_default_config_path() {
        Some(path) if path.is_file() => load_config(&path),
        _ => Ok(HarvestConfig::default()),
    }
}

fn parse_config_str(raw: &str) -> Result<HarvestConfig, toml::de::Error> {
    toml::from_str(raw)
}
