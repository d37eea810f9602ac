//! Configuration loader with file and environment variable support

use crate::{AppConfig, ConfigError};
use std::env;
use std::path::PathBuf;
use tracing::{info, warn};

/// Standard config file search paths
const CONFIG_PATHS: &[&str] = &[
    "config.toml",
    "approle.toml",
    "./config/config.toml",
    "./config/approle.toml",
    "/etc/approle/config.toml",
];

/// Configuration loader
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        Self { config_path: None }
    }

    /// Create a loader with a specific config file path
    pub fn with_path<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            config_path: Some(path.into()),
        }
    }

    /// Load configuration from file (if found) with environment variable overrides
    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        self.load_with(|key| env::var(key).ok())
    }

    /// Same as [`load`](Self::load) but reads overrides from `lookup`.
    pub fn load_with<F>(&self, lookup: F) -> Result<AppConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = AppConfig::default();

        if let Some(path) = self.find_config_file(&lookup) {
            info!(?path, "Loading configuration from file");
            config = AppConfig::from_file(&path)?;
        }

        apply_overrides(&mut config, &lookup)?;
        config.validate()?;

        Ok(config)
    }

    fn find_config_file<F>(&self, lookup: &F) -> Option<PathBuf>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = &self.config_path {
            if path.exists() {
                return Some(path.clone());
            }
            warn!(?path, "Configured file does not exist, searching defaults");
        }

        if let Some(path) = lookup("APPROLE_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        CONFIG_PATHS
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn apply_overrides<F>(config: &mut AppConfig, lookup: &F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    // HTTP
    if let Some(val) = lookup("APPROLE_HTTP_PORT") {
        config.http.port = val.parse().map_err(|_| {
            ConfigError::ValidationError(format!("APPROLE_HTTP_PORT is not a port: {}", val))
        })?;
    }
    if let Some(val) = lookup("APPROLE_HTTP_HOST") {
        config.http.host = val;
    }
    if let Some(val) = lookup("APPROLE_CORS_ORIGINS") {
        config.http.cors_origins = val.split(',').map(|s| s.trim().to_string()).collect();
    }

    // MongoDB
    if let Some(val) = lookup("APPROLE_MONGODB_URI") {
        config.mongodb.uri = val;
    }
    if let Some(val) = lookup("APPROLE_MONGODB_DATABASE") {
        config.mongodb.database = val;
    }

    // Store
    if let Some(val) = lookup("APPROLE_STORE_TYPE") {
        config.store.store_type = val.parse()?;
    }

    // Directory
    if let Some(val) = lookup("APPROLE_DIRECTORY_PUBLIC_URL") {
        config.directory.public_url = val;
    }
    if let Some(val) = lookup("APPROLE_DIRECTORY_LEGACY_SERVER_URL") {
        config.directory.legacy_server_url = val;
    }
    if let Some(val) = lookup("APPROLE_DIRECTORY_ENDPOINT_PATH") {
        config.directory.endpoint_path = val;
    }

    // General
    if let Some(val) = lookup("APPROLE_DEV_MODE") {
        config.dev_mode = val == "true" || val == "1";
    }

    Ok(())
}
