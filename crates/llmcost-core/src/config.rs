//! Configuration management for llmcost

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Prefix for environment overrides, e.g. `LLMCOST__PRICING__PRICES_FILE`
pub const ENV_PREFIX: &str = "LLMCOST";

/// Main configuration struct
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Pricing configuration
    pub pricing: PricingConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Pricing configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Path to the model price definitions
    pub prices_file: PathBuf,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            prices_file: PathBuf::from("model_prices_and_context_window.json"),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level
    pub level: String,
    /// Log format (json or pretty)
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
}

impl Config {
    /// Load configuration
    ///
    /// Sources, later ones winning: built-in defaults, the TOML file at
    /// `path` (or the per-user default location when `path` is `None`),
    /// then `LLMCOST__*` environment variables. An explicit `path` must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        match path {
            Some(path) => {
                debug!(path = %path.display(), "Loading configuration file");
                builder = builder.add_source(config::File::from(path).required(true));
            }
            None => {
                if let Some(path) = default_config_path() {
                    debug!(path = %path.display(), "Looking for configuration file");
                    builder = builder.add_source(config::File::from(path).required(false));
                }
            }
        }

        let config: Config = builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.pricing.prices_file.as_os_str().is_empty() {
            return Err(Error::config("pricing.prices_file must not be empty"));
        }
        if self.logging.level.trim().is_empty() {
            return Err(Error::config("logging.level must not be empty"));
        }
        Ok(())
    }
}

/// Per-user configuration file, e.g. `~/.config/llmcost/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "llmcost").map(|dirs| dirs.config_dir().join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(
            config.pricing.prices_file,
            PathBuf::from("model_prices_and_context_window.json")
        );
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[pricing]\nprices_file = \"/etc/llmcost/prices.json\"\n\n[logging]\nformat = \"json\""
        )
        .unwrap();

        let config = Config::load(Some(file.path())).unwrap();

        assert_eq!(config.pricing.prices_file, PathBuf::from("/etc/llmcost/prices.json"));
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let err = Config::load(Some(path.as_path())).unwrap_err();
        assert!(matches!(err, Error::ConfigSource(_)));
    }

    #[test]
    fn test_empty_prices_file_rejected() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[pricing]\nprices_file = \"\"").unwrap();

        let err = Config::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
