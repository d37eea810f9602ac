//! AppRole Configuration System
//!
//! TOML-based configuration with environment variable overrides.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

mod loader;

pub use loader::ConfigLoader;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Root application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub mongodb: MongoConfig,
    pub store: StoreConfig,
    pub directory: DirectoryConfig,

    /// Enable development mode (seeds the in-memory directory)
    pub dev_mode: bool,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub port: u16,
    pub host: String,
    pub cors_origins: Vec<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "0.0.0.0".to_string(),
            cors_origins: vec!["http://localhost:4200".to_string()],
        }
    }
}

/// MongoDB configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            uri: "mongodb://localhost:27017".to_string(),
            database: "approle".to_string(),
        }
    }
}

/// Which role store backs the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreType {
    #[default]
    Mongodb,
    Memory,
}

impl FromStr for StoreType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mongodb" | "mongo" => Ok(StoreType::Mongodb),
            "memory" => Ok(StoreType::Memory),
            other => Err(ConfigError::ValidationError(format!(
                "Unknown store type '{}' (expected mongodb or memory)",
                other
            ))),
        }
    }
}

/// Role store configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    #[serde(rename = "type")]
    pub store_type: StoreType,
}

/// Identity directory URL settings used to build `$ref` links
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    /// Public base URL of the server (tenant-qualified URL builder input)
    pub public_url: String,
    /// Server URL used by the legacy URL composition
    pub legacy_server_url: String,
    /// Directory endpoint appended to the base URL
    pub endpoint_path: String,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            public_url: "https://localhost:9443".to_string(),
            legacy_server_url: "https://localhost:9443".to_string(),
            endpoint_path: "/scim2".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration with environment variable override
    pub fn load() -> Result<Self, ConfigError> {
        ConfigLoader::new().load()
    }

    /// Check values that would otherwise fail late, at first use.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http.port == 0 {
            return Err(ConfigError::ValidationError("http.port must be non-zero".to_string()));
        }
        if self.store.store_type == StoreType::Mongodb {
            if self.mongodb.uri.trim().is_empty() {
                return Err(ConfigError::ValidationError("mongodb.uri is required".to_string()));
            }
            if self.mongodb.database.trim().is_empty() {
                return Err(ConfigError::ValidationError("mongodb.database is required".to_string()));
            }
        }
        if !self.directory.endpoint_path.starts_with('/') {
            return Err(ConfigError::ValidationError(format!(
                "directory.endpoint_path must start with '/': {}",
                self.directory.endpoint_path
            )));
        }
        if self.directory.legacy_server_url.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "directory.legacy_server_url is required".to_string(),
            ));
        }
        Ok(())
    }

    /// Generate an example TOML configuration
    pub fn example_toml() -> String {
        r#"# AppRole Configuration
# Environment variables (APPROLE_*) override these settings

[http]
port = 8080
host = "0.0.0.0"
cors_origins = ["http://localhost:4200"]

[mongodb]
uri = "mongodb://localhost:27017"
database = "approle"

[store]
type = "mongodb"  # mongodb or memory

[directory]
public_url = "https://localhost:9443"
legacy_server_url = "https://localhost:9443"
endpoint_path = "/scim2"

dev_mode = false
"#
        .to_string()
    }
}
