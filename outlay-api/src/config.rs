//! Configuration management for the API server
//!
//! Loads configuration from environment variables into a typed struct.
//!
//! # Environment Variables
//!
//! - `MONGO_URI`: MongoDB connection string (required)
//! - `MONGO_DB`: database name (required)
//! - `API_HOST`: host to bind to (default: 0.0.0.0)
//! - `API_PORT`: port to bind to (default: 3000)
//! - `RUST_LOG`: log filter (default: info-level for the server crates)

use outlay_shared::db::StoreConfig;
use serde::{Deserialize, Serialize};
use std::env;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Document-store configuration
    pub store: MongoConfig,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,
}

/// Document-store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoConfig {
    /// MongoDB connection URI
    pub uri: String,

    /// Database holding all collections
    pub database: String,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error when `MONGO_URI` or `MONGO_DB` is missing, or when
    /// `API_PORT` is not a valid port number.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("API_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()?;

        let uri = env::var("MONGO_URI")
            .map_err(|_| anyhow::anyhow!("MONGO_URI environment variable is required"))?;
        let database = env::var("MONGO_DB")
            .map_err(|_| anyhow::anyhow!("MONGO_DB environment variable is required"))?;

        Ok(Self {
            api: ApiConfig { host, port },
            store: MongoConfig { uri, database },
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }

    /// Returns the connection settings in the shape the data layer takes
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            uri: self.store.uri.clone(),
            database: self.store.database.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_address() {
        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
            },
            store: MongoConfig {
                uri: "mongodb://localhost:27017".to_string(),
                database: "outlay_test".to_string(),
            },
        };

        assert_eq!(config.bind_address(), "127.0.0.1:3000");
        assert_eq!(config.store_config().database, "outlay_test");
    }
}
