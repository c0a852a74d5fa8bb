//! User configuration in `<config dir>/prune/config.toml`
//!
//! Every field is optional; a missing file means defaults.

use crate::cleanup::{LookupOptions, RetryPolicy};
use crate::error::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding the config file location
pub const CONFIG_ENV: &str = "PRUNE_CONFIG";

/// Directory name under the platform config dir
const CONFIG_DIR: &str = "prune";

/// Config filename
const CONFIG_FILE: &str = "config.toml";

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Remote to use when `--remote` is not given
    pub remote: Option<String>,
    /// Lookup pacing
    pub lookup: LookupConfig,
}

/// Pacing and retry settings for PR lookups
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct LookupConfig {
    /// Pause after each successful lookup, in milliseconds
    pub interval_ms: u64,
    /// Retries when the platform reports rate limiting
    pub max_retries: u32,
    /// First retry delay in milliseconds (doubles per retry)
    pub retry_base_ms: u64,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            interval_ms: 1000,
            max_retries: 2,
            retry_base_ms: 2000,
        }
    }
}

impl LookupConfig {
    /// Convert to the options the lookup engine takes
    pub const fn to_options(&self) -> LookupOptions {
        LookupOptions {
            interval: Duration::from_millis(self.interval_ms),
            retry: RetryPolicy {
                max_retries: self.max_retries,
                base_delay: Duration::from_millis(self.retry_base_ms),
            },
        }
    }
}

/// Location of the config file
///
/// `PRUNE_CONFIG` wins over the platform config directory.
pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
}

/// Load the config from the default location
pub fn load_config() -> Result<Config> {
    match config_path() {
        Some(path) => load_config_from(&path),
        None => Ok(Config::default()),
    }
}

/// Load the config from `path`; a missing file yields defaults
pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;

    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("failed to parse {}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_default() {
        let dir = TempDir::new().unwrap();
        let config = load_config_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.lookup.interval_ms, 1000);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "remote = \"upstream\"\n[lookup]\ninterval_ms = 250\n").unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.remote.as_deref(), Some("upstream"));
        assert_eq!(config.lookup.interval_ms, 250);
        assert_eq!(config.lookup.max_retries, 2);

        let options = config.lookup.to_options();
        assert_eq!(options.interval, Duration::from_millis(250));
        assert_eq!(options.retry.base_delay, Duration::from_secs(2));
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[lookup]\nintervl_ms = 5\n").unwrap();

        assert!(matches!(load_config_from(&path), Err(Error::Config(_))));
    }
}
