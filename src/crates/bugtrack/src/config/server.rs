//! Server configuration for bugtrack-server
//!
//! Loads and parses `bugtrack-server.toml`. Every section and key has a
//! default, so a partial file (or no file at all) is a valid configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::query::DEFAULT_PAGE_SIZE;

/// File name searched for when no explicit path is given
pub const CONFIG_FILE_NAME: &str = "bugtrack-server.toml";

#[derive(Debug, Error)]
pub enum ServerConfigError {
    #[error("Failed to read config file {path}: {source}")]
    ReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Server identification and bind address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerInfoConfig {
    /// Server name (reported by the health endpoints)
    pub name: String,
    pub host: String,
    pub port: u16,
}

impl Default for ServerInfoConfig {
    fn default() -> Self {
        Self {
            name: "bugtrack-server".to_string(),
            host: "127.0.0.1".to_string(),
            port: 3030,
        }
    }
}

/// Location of the JSON collection files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub bugs_path: PathBuf,
    pub users_path: PathBuf,
    /// Write a handful of demo bugs into an empty bug collection
    pub seed_demo_data: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            bugs_path: PathBuf::from("data/bug.json"),
            users_path: PathBuf::from("data/user.json"),
            seed_demo_data: false,
        }
    }
}

/// Listing defaults and limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    pub default_page_size: usize,
    /// Larger requested page sizes are clamped to this
    pub max_page_size: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: 100,
        }
    }
}

/// Session and CORS settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Lifetime of a login session in seconds
    pub session_ttl_secs: u64,
    /// Username granted admin rights at startup, if that user exists
    pub bootstrap_admin: Option<String>,
    /// Allowed CORS origins; empty means any origin
    pub allowed_origins: Vec<String>,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            session_ttl_secs: 60 * 60 * 24,
            bootstrap_admin: None,
            allowed_origins: Vec::new(),
        }
    }
}

/// Complete server configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub server: ServerInfoConfig,
    pub storage: StorageConfig,
    pub query: QueryConfig,
    pub security: SecurityConfig,
}

impl ServerConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ServerConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|source| ServerConfigError::ReadError {
                path: path.display().to_string(),
                source,
            })?;
        Self::from_str(&content)
    }

    /// Load configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self, ServerConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from an explicit path or the default locations
    ///
    /// Searches, in order:
    /// 1. `explicit` (from `--config` / `CONFIG_PATH`)
    /// 2. ./config/bugtrack-server.toml
    /// 3. ./bugtrack-server.toml
    ///
    /// Falls back to defaults when no file exists.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ServerConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        let paths = [
            Path::new("config").join(CONFIG_FILE_NAME),
            PathBuf::from(CONFIG_FILE_NAME),
        ];

        for path in &paths {
            if path.exists() {
                tracing::info!("Loading configuration from {}", path.display());
                return Self::from_file(path);
            }
        }

        tracing::info!("No configuration file found, using defaults");
        Ok(Self::default())
    }

    fn validate(&self) -> Result<(), ServerConfigError> {
        if self.query.max_page_size == 0 {
            return Err(ServerConfigError::InvalidConfig(
                "query.max_page_size must be greater than 0".to_string(),
            ));
        }
        if self.query.default_page_size == 0
            || self.query.default_page_size > self.query.max_page_size
        {
            return Err(ServerConfigError::InvalidConfig(format!(
                "query.default_page_size must be between 1 and {}",
                self.query.max_page_size
            )));
        }
        if self.security.session_ttl_secs == 0 {
            return Err(ServerConfigError::InvalidConfig(
                "security.session_ttl_secs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// `host:port` to bind
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
