//! Configuration for the Greenlight server
//!
//! Loaded from `GREENLIGHT_*` environment variables with serde defaults, so
//! the binary starts with no configuration at all in development.

use serde::{Deserialize, Serialize};
use std::env;

use crate::error::{ServerError, ServerResult};

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Host to bind to
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Tracing filter directive
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_port() -> u16 {
    8080
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_log_filter() -> String {
    "info,greenlight=debug".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind_address: default_bind_address(),
            log_filter: default_log_filter(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn load() -> ServerResult<Self> {
        let mut config = Self::default();

        if let Ok(port) = env::var("GREENLIGHT_PORT") {
            config.port = port.parse().map_err(|_| {
                ServerError::Config(format!("GREENLIGHT_PORT is not a valid port: {}", port))
            })?;
        }

        if let Ok(bind_address) = env::var("GREENLIGHT_BIND_ADDRESS") {
            config.bind_address = bind_address;
        }

        if let Ok(log_filter) = env::var("GREENLIGHT_LOG_FILTER") {
            config.log_filter = log_filter;
        }

        Ok(config)
    }

    /// The socket address string the server binds to
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.bind_address, "0.0.0.0");
        assert_eq!(config.listen_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_deserializes_with_defaults() {
        let config: ServerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.port, 8080);

        let config: ServerConfig =
            serde_json::from_str(r#"{"port": 9999, "bind_address": "127.0.0.1"}"#).unwrap();
        assert_eq!(config.port, 9999);
        assert_eq!(config.listen_addr(), "127.0.0.1:9999");
    }
}
