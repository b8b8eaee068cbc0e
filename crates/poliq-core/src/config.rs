//! Client configuration model.
//!
//! The configuration file is loaded by `poliq-infrastructure`; this module
//! only defines the typed shape.

use serde::{Deserialize, Serialize};

/// Default base URL of the policy Q&A service.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Root configuration for the poliq client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Remote service settings.
    #[serde(default)]
    pub server: ServerConfig,
}

/// Connection settings for the remote policy Q&A service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL the endpoint paths are joined onto.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_base_url() {
        let config = AppConfig::default();
        assert_eq!(config.server.base_url, "http://localhost:8000");
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.server.base_url, DEFAULT_BASE_URL);

        let config: AppConfig = toml::from_str("[server]\nbase_url = \"https://qa.example.com\"\n")
            .unwrap();
        assert_eq!(config.server.base_url, "https://qa.example.com");
    }
}
