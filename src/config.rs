//! Configuration management for GymOps server

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Connection settings for the remote gym API
#[derive(Debug, Deserialize, Clone)]
pub struct RemoteConfig {
    /// Base URL, without the `/api` suffix (e.g. "http://localhost:8090")
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    /// "pretty" or "json"
    pub format: String,
}

/// Dashboard behaviour shared by several services
#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    /// Refresh interval of the open-ticket counter, in seconds (0 disables polling)
    pub ticket_poll_seconds: u64,
    /// Timeout applied to each remote filter fetch, in seconds (at least 1)
    pub filter_timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Environment variables (with prefix GYMOPS_), e.g. GYMOPS_SERVER__PORT
            .add_source(
                Environment::with_prefix("GYMOPS")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("remote.base_url", env::var("REMOTE_API_URL").ok())?
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would time out every backend call
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.remote.timeout_seconds == 0 {
            return Err(ConfigError::Message(
                "remote.timeout_seconds must be at least 1".to_string(),
            ));
        }
        if self.dashboard.filter_timeout_seconds == 0 {
            return Err(ConfigError::Message(
                "dashboard.filter_timeout_seconds must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8090".to_string(),
            timeout_seconds: 15,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            ticket_poll_seconds: 60,
            filter_timeout_seconds: 10,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            remote: RemoteConfig::default(),
            logging: LoggingConfig::default(),
            dashboard: DashboardConfig::default(),
        }
    }
}
