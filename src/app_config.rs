//! Application configuration loading for CLI defaults.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use akakce_search_core::batch::{DEFAULT_THROTTLE_MAX, DEFAULT_THROTTLE_MIN};
use anyhow::{Context, Result, bail};
use serde::Deserialize;

const APP_DIR: &str = "akakce-search";
const CONFIG_FILE: &str = "config.toml";

/// TOML-backed file configuration for run defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Proxy for plain-HTTP search requests.
    pub http_proxy: Option<String>,
    /// Proxy for HTTPS search requests.
    pub https_proxy: Option<String>,
    /// Log file path.
    pub log_file: Option<PathBuf>,
    /// Directory for the default output file.
    pub output_dir: Option<PathBuf>,
    /// Candidates requested per search (1..=50).
    pub result_cap: Option<usize>,
    /// Attempts per query when rate limited (1..=10).
    pub max_attempts: Option<u32>,
    /// Base backoff wait in seconds (1..=600).
    pub backoff_base_secs: Option<u64>,
    /// Lower bound of the inter-query pause in milliseconds (0..=60000).
    pub throttle_min_ms: Option<u64>,
    /// Upper bound of the inter-query pause in milliseconds (0..=60000).
    pub throttle_max_ms: Option<u64>,
    /// Default verbosity mode.
    pub verbosity: Option<VerbositySetting>,
}

impl FileConfig {
    /// Validates config values against runtime constraints.
    pub fn validate(&self) -> Result<()> {
        if let Some(result_cap) = self.result_cap
            && !(1..=50).contains(&result_cap)
        {
            bail!("Invalid config value for `result_cap`: {result_cap}. Expected range: 1..=50");
        }

        if let Some(max_attempts) = self.max_attempts
            && !(1..=10).contains(&max_attempts)
        {
            bail!(
                "Invalid config value for `max_attempts`: {max_attempts}. Expected range: 1..=10"
            );
        }

        if let Some(base) = self.backoff_base_secs
            && !(1..=600).contains(&base)
        {
            bail!("Invalid config value for `backoff_base_secs`: {base}. Expected range: 1..=600");
        }

        validate_throttle_ms("throttle_min_ms", self.throttle_min_ms)?;
        validate_throttle_ms("throttle_max_ms", self.throttle_max_ms)?;
        if self.throttle_min_ms.is_some() || self.throttle_max_ms.is_some() {
            let min = self
                .throttle_min_ms
                .map_or(DEFAULT_THROTTLE_MIN.as_millis(), u128::from);
            let max = self
                .throttle_max_ms
                .map_or(DEFAULT_THROTTLE_MAX.as_millis(), u128::from);
            if min > max {
                bail!(
                    "Invalid config: `throttle_min_ms` ({min}) must not exceed `throttle_max_ms` ({max}); unset bounds default to {}..={} ms",
                    DEFAULT_THROTTLE_MIN.as_millis(),
                    DEFAULT_THROTTLE_MAX.as_millis()
                );
            }
        }

        Ok(())
    }
}

fn validate_throttle_ms(field: &str, value: Option<u64>) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };
    if value > 60_000 {
        bail!("Invalid config value for `{field}`: {value}. Expected range: 0..=60000");
    }
    Ok(())
}

/// Supported config verbosity labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerbositySetting {
    Default,
    Verbose,
    Quiet,
    Debug,
}

/// Loaded config metadata.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// Resolved config path if a base directory is known.
    pub path: Option<PathBuf>,
    /// Parsed file config when a config file exists and was valid.
    pub config: Option<FileConfig>,
}

impl LoadedConfig {
    /// Returns true when a config file was read from disk.
    #[must_use]
    pub fn loaded_from_file(&self) -> bool {
        self.config.is_some()
    }
}

/// Resolves default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/akakce-search/config.toml`
/// 2. `$HOME/.config/akakce-search/config.toml`
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    if let Some(xdg_config_home) = env_var_non_empty_os("XDG_CONFIG_HOME") {
        return Some(PathBuf::from(xdg_config_home).join(APP_DIR).join(CONFIG_FILE));
    }

    let home = env_var_non_empty_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join(APP_DIR)
            .join(CONFIG_FILE),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<std::ffi::OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Loads config from `explicit` if given, otherwise from the default path.
///
/// A missing default file is not an error; a missing explicit file is.
pub fn load_config(explicit: Option<&Path>) -> Result<LoadedConfig> {
    if let Some(path) = explicit {
        let config = load_file_config(path)?;
        return Ok(LoadedConfig {
            path: Some(path.to_path_buf()),
            config: Some(config),
        });
    }

    let path = resolve_default_config_path();
    let config = match path.as_deref() {
        Some(path_ref) if path_ref.exists() => Some(load_file_config(path_ref)?),
        _ => None,
    };
    Ok(LoadedConfig { path, config })
}

fn load_file_config(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    parse_config_str(&raw)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))
}

fn parse_config_str(raw: &str) -> Result<FileConfig> {
    let cfg: FileConfig = toml::from_str(raw)?;
    cfg.validate()?;
    Ok(cfg)
}
