//! Application configuration loaded from environment variables.

use std::env;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Discord bot token
    pub discord_token: String,
    /// GCP project ID
    pub gcp_project_id: String,
    /// Liveness HTTP server port
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A missing `DISCORD_TOKEN` is fatal; everything else has a default.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            discord_token: env::var("DISCORD_TOKEN")
                .map_err(|_| ConfigError::Missing("DISCORD_TOKEN"))?,
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
        })
    }

    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            discord_token: "test_token".to_string(),
            gcp_project_id: "test-project".to_string(),
            port: 3000,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        env::set_var("DISCORD_TOKEN", "test_token");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.discord_token, "test_token");
        assert_eq!(config.port, 3000);
    }
}
