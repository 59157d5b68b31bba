//! Centralized client configuration.
//!
//! This module provides strongly-typed configuration for the client,
//! loaded via the `config` crate from environment variables.

use std::path::PathBuf;

use serde::Deserialize;

/// Client configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the authentication backend.
    #[serde(default = "default_backend_url")]
    pub backend_url: String,

    /// Directory holding the durable session state.
    #[serde(default = "default_state_dir")]
    pub state_dir: PathBuf,
}

fn default_backend_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_state_dir() -> PathBuf {
    PathBuf::from(".vestibule")
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            state_dir: default_state_dir(),
        }
    }
}

impl ClientConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration value cannot be parsed.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(
                config::Environment::default()
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_config_has_correct_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.backend_url, "http://localhost:8000");
        assert_eq!(config.state_dir, PathBuf::from(".vestibule"));
    }
}
