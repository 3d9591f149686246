//! Configuration loading and management
//!
//! Configuration comes from an optional YAML file, then environment
//! variables override individual values:
//!
//! | Variable | Field |
//! |---|---|
//! | `PORT` | port of `server.bind` |
//! | `MONGO_URI` | `storage.mongo_uri` (also selects the MongoDB backend) |
//! | `SALES_DB_NAME` | `storage.database` |
//! | `SALES_COLLECTION` | `storage.collection` |
//! | `SALES_SEED_FILE` | `storage.seed_file` |
//! | `QUERY_TIMEOUT_MS` | `query.timeout_ms` |
//! | `APP_ENV` | `environment` |

use crate::core::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;

/// HTTP server settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to listen on
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:5000".to_string(),
        }
    }
}

/// Which record store to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    #[default]
    InMemory,
    Mongodb,
}

/// Record store settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,

    /// MongoDB connection string (required for the MongoDB backend)
    pub mongo_uri: Option<String>,

    /// Database holding the sales collection
    pub database: String,

    /// Collection holding sales records
    pub collection: String,

    /// JSON array of records loaded into the in-memory store
    pub seed_file: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::InMemory,
            mongo_uri: None,
            database: "test".to_string(),
            collection: "salerecords".to_string(),
            seed_file: None,
        }
    }
}

/// Query execution settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Deadline for every store operation, in milliseconds
    pub timeout_ms: u64,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self { timeout_ms: 5000 }
    }
}

impl QueryConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub query: QueryConfig,

    /// Deployment environment reported by the health endpoints
    pub environment: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
            query: QueryConfig::default(),
            environment: "development".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::parse_yaml(&content, path)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Self::parse_yaml(yaml, "<inline>")
    }

    fn parse_yaml(yaml: &str, origin: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse {
            path: origin.to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults overridden by the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().apply_env_overrides()
    }

    /// Apply overrides from the process environment
    pub fn apply_env_overrides(self) -> Result<Self, ConfigError> {
        let vars: HashMap<String, String> = std::env::vars().collect();
        self.apply_overrides(&vars)
    }

    /// Apply overrides from a variable map
    pub fn apply_overrides(mut self, vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let get = |key: &str| vars.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());

        if let Some(port) = get("PORT") {
            let port: u16 = port.parse().map_err(|_| ConfigError::InvalidValue {
                field: "PORT".to_string(),
                message: format!("'{}' is not a port number", port),
            })?;
            let mut addr = self.bind_addr()?;
            addr.set_port(port);
            self.server.bind = addr.to_string();
        }
        if let Some(uri) = get("MONGO_URI") {
            self.storage.mongo_uri = Some(uri.to_string());
            self.storage.backend = StorageBackend::Mongodb;
        }
        if let Some(database) = get("SALES_DB_NAME") {
            self.storage.database = database.to_string();
        }
        if let Some(collection) = get("SALES_COLLECTION") {
            self.storage.collection = collection.to_string();
        }
        if let Some(seed) = get("SALES_SEED_FILE") {
            self.storage.seed_file = Some(seed.to_string());
        }
        if let Some(timeout) = get("QUERY_TIMEOUT_MS") {
            self.query.timeout_ms = timeout.parse().map_err(|_| ConfigError::InvalidValue {
                field: "QUERY_TIMEOUT_MS".to_string(),
                message: format!("'{}' is not a number of milliseconds", timeout),
            })?;
        }
        if let Some(env) = get("APP_ENV") {
            self.environment = env.to_string();
        }

        self.validate()?;
        Ok(self)
    }

    /// Parsed listen address
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.server
            .bind
            .parse()
            .map_err(|_| ConfigError::InvalidValue {
                field: "server.bind".to_string(),
                message: format!("'{}' is not a socket address", self.server.bind),
            })
    }

    /// Check cross-field consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bind_addr()?;

        if self.query.timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "query.timeout_ms".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }

        if self.storage.backend == StorageBackend::Mongodb && self.storage.mongo_uri.is_none() {
            return Err(ConfigError::MissingField {
                field: "storage.mongo_uri".to_string(),
            });
        }

        Ok(())
    }
}
