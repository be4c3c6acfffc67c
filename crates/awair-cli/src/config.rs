//! Configuration file support for the awair CLI
//!
//! Provides:
//! - Config file discovery (CLI flag, env var, user config directory)
//! - TOML parsing with serde
//! - Environment variable overrides
//! - Validation

use awair_client::AwairConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Complete CLI configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// CLI settings
    pub cli: CliSettings,

    /// Client defaults
    pub client: AwairConfig,
}

/// CLI settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CliSettings {
    /// Log level: trace, debug, info, warn, error
    pub log_level: String,
}

impl Default for CliSettings {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
        }
    }
}

/// Configuration loader
pub struct ConfigLoader {
    /// Path to config file (if specified via CLI)
    cli_path: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a new config loader
    pub fn new() -> Self {
        Self { cli_path: None }
    }

    /// Set the config path from CLI argument
    pub fn with_cli_path(mut self, path: Option<PathBuf>) -> Self {
        self.cli_path = path;
        self
    }

    /// Load configuration with the following precedence:
    /// 1. CLI --config flag
    /// 2. AWAIR_CONFIG environment variable
    /// 3. <config dir>/awair/config.toml
    /// 4. Default values
    ///
    /// `AWAIR_*` environment variables are applied on top of the file.
    pub fn load(&self) -> ConfigResult<CliConfig> {
        let mut config = match self.find_config_file() {
            Some(path) => {
                info!("Loading configuration from: {}", path.display());
                self.load_from_file(&path)?
            }
            None => {
                debug!("No config file found, using defaults");
                CliConfig::default()
            }
        };

        self.apply_env_overrides(&mut config);
        self.validate(&config)?;

        Ok(config)
    }

    /// Find the config file to use
    fn find_config_file(&self) -> Option<PathBuf> {
        if let Some(path) = &self.cli_path {
            if path.exists() {
                return Some(path.clone());
            }
            warn!("CLI config path does not exist: {}", path.display());
        }

        if let Ok(env_path) = std::env::var("AWAIR_CONFIG") {
            let path = PathBuf::from(&env_path);
            if path.exists() {
                return Some(path);
            }
            warn!("AWAIR_CONFIG path does not exist: {}", env_path);
        }

        Self::default_config_path().filter(|path| path.exists())
    }

    /// Load configuration from a TOML file
    pub fn load_from_file(&self, path: &Path) -> ConfigResult<CliConfig> {
        let content = std::fs::read_to_string(path)?;
        let config: CliConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&self, config: &mut CliConfig) {
        if let Ok(val) = std::env::var("AWAIR_LOG_LEVEL") {
            config.cli.log_level = val;
        }
        config.client.apply_env();
    }

    /// Validate configuration
    pub fn validate(&self, config: &CliConfig) -> ConfigResult<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&config.cli.log_level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "Invalid log level: {}. Must be one of: {:?}",
                config.cli.log_level, valid_levels
            )));
        }

        let transport = &config.client.transport;
        if transport.timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "Request timeout cannot be 0".to_string(),
            ));
        }
        if transport.initial_retry_delay_ms > transport.max_retry_delay_ms {
            return Err(ConfigError::ValidationError(format!(
                "initial_retry_delay_ms ({}) exceeds max_retry_delay_ms ({})",
                transport.initial_retry_delay_ms, transport.max_retry_delay_ms
            )));
        }

        Ok(())
    }

    /// Get the default config file path for the current platform
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("awair").join("config.toml"))
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = CliConfig::default();
        assert_eq!(config.cli.log_level, "warn");
        assert!(!config.client.mock_mode);
        assert!(ConfigLoader::new().validate(&config).is_ok());
    }

    #[test]
    fn test_parse_full_toml() {
        let toml_str = r#"
            [cli]
            log_level = "debug"

            [client]
            bearer_token = "secret"
            device_type = "awair-element"
            device_id = 1234
            mock_mode = true

            [client.transport]
            api_endpoint = "http://localhost:8080/v1"
            max_retries = 5

            [client.transport.headers]
            X-Request-Source = "cli"
        "#;

        let config: CliConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.cli.log_level, "debug");
        assert_eq!(config.client.bearer_token.as_deref(), Some("secret"));
        assert_eq!(config.client.device_id, Some(1234));
        assert!(config.client.mock_mode);
        assert_eq!(config.client.transport.max_retries, 5);
        assert_eq!(
            config.client.transport.headers.get("X-Request-Source").map(String::as_str),
            Some("cli")
        );
        // Unset transport fields keep their defaults
        assert_eq!(config.client.transport.timeout_ms, 30_000);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[client]\ndevice_type = \"awair-omni\"").unwrap();

        let loader = ConfigLoader::new();
        let config = loader.load_from_file(file.path()).unwrap();
        assert_eq!(config.client.device_type.as_deref(), Some("awair-omni"));
    }

    #[test]
    fn test_validation_invalid_log_level() {
        let config = CliConfig {
            cli: CliSettings {
                log_level: "loud".to_string(),
            },
            ..Default::default()
        };
        assert!(ConfigLoader::new().validate(&config).is_err());
    }

    #[test]
    fn test_validation_retry_delays() {
        let mut config = CliConfig::default();
        config.client.transport.initial_retry_delay_ms = 10_000;
        config.client.transport.max_retry_delay_ms = 100;
        assert!(ConfigLoader::new().validate(&config).is_err());
    }
}
