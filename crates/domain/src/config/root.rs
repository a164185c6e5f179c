use serde::{Deserialize, Serialize};

use super::errors::ConfigError;
use super::logging::LoggingConfig;
use super::persistence::PersistenceConfig;
use super::secondary::{split_primaries, SecondaryConfig};
use super::server::ServerConfig;

/// Main configuration structure for zonesync
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Listener configuration (port, bind address)
    #[serde(default)]
    pub server: ServerConfig,

    /// Primaries and probe/transfer settings
    #[serde(default)]
    pub secondary: SecondaryConfig,

    /// Storage backends for transferred zones
    #[serde(default)]
    pub persistence: PersistenceConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. zonesync.toml in current directory
    /// 3. /etc/zonesync/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if let Some(found) = Self::get_config_path() {
            Self::from_file(&found)?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(port) = overrides.dns_port {
            self.server.dns_port = port;
        }
        if let Some(bind) = overrides.bind_address {
            self.server.bind_address = bind;
        }
        if let Some(db) = overrides.database_path {
            self.persistence.database_path = db;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        if !overrides.primaries.is_empty() {
            self.secondary.primaries = split_primaries(overrides.primaries);
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.dns_port == 0 {
            return Err(ConfigError::Validation("DNS port cannot be 0".to_string()));
        }

        if self.secondary.primaries.is_empty() {
            return Err(ConfigError::Validation(
                "No primaries configured".to_string(),
            ));
        }

        self.secondary.parsed_primaries()?;

        if self.secondary.probe_timeout == 0 {
            return Err(ConfigError::Validation(
                "probe_timeout must be at least 1 second".to_string(),
            ));
        }

        if self.secondary.transfer_timeout == 0 {
            return Err(ConfigError::Validation(
                "transfer_timeout must be at least 1 second".to_string(),
            ));
        }

        if self.persistence.backends.is_empty() {
            return Err(ConfigError::Validation(
                "No persistence backends configured".to_string(),
            ));
        }

        Ok(())
    }

    /// Get the path to the configuration file being used
    pub fn get_config_path() -> Option<String> {
        if std::path::Path::new("zonesync.toml").exists() {
            Some("zonesync.toml".to_string())
        } else if std::path::Path::new("/etc/zonesync/config.toml").exists() {
            Some("/etc/zonesync/config.toml".to_string())
        } else {
            None
        }
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub dns_port: Option<u16>,
    pub bind_address: Option<String>,
    pub database_path: Option<String>,
    pub log_level: Option<String>,
    pub primaries: Vec<String>,
}
