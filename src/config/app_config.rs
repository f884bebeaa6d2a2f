use serde::Deserialize;

use crate::domain::registration::RegistrationRules;
use crate::domain::user::{NameLengthRule, DEFAULT_MAX_NAME_LENGTH, DEFAULT_MIN_NAME_LENGTH};
use crate::domain::DomainError;
use crate::infrastructure::observability::MetricsConfig;
use crate::infrastructure::storage::PostgresConfig;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub registration: RegistrationConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Where users are stored
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    Postgres,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub database_url: Option<String>,
    pub max_connections: u32,
}

/// Username length bounds for the registration chain
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RegistrationConfig {
    pub name_min_length: usize,
    pub name_max_length: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            database_url: None,
            max_connections: 10,
        }
    }
}

impl StorageConfig {
    /// PostgreSQL settings, failing when no database URL is configured
    pub fn postgres(&self) -> Result<PostgresConfig, DomainError> {
        let url = self
            .database_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .ok_or_else(|| {
                DomainError::configuration("storage.database_url is required for postgres")
            })?;

        Ok(PostgresConfig::new(url).with_max_connections(self.max_connections))
    }
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            name_min_length: DEFAULT_MIN_NAME_LENGTH,
            name_max_length: DEFAULT_MAX_NAME_LENGTH,
        }
    }
}

impl RegistrationConfig {
    /// Build the registration rules, rejecting inverted or empty bounds
    pub fn rules(&self) -> Result<RegistrationRules, DomainError> {
        if self.name_min_length == 0 || self.name_min_length > self.name_max_length {
            return Err(DomainError::configuration(format!(
                "invalid username length bounds: min {} max {}",
                self.name_min_length, self.name_max_length
            )));
        }

        Ok(RegistrationRules {
            name_length: NameLengthRule {
                min: self.name_min_length,
                max: self.name_max_length,
            },
        })
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
