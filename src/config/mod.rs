//! Configuration Module
//!
//! Centralized configuration for the server, token issuing and the external
//! place-search provider. The database pool settings live in
//! [`crate::database::DatabaseConfig`].

use thiserror::Error;

use crate::database::DatabaseConfig;

/// Environment variable helpers
pub mod env {
    use std::env;

    /// Get environment variable as string with default
    pub fn get_string(key: &str, default: &str) -> String {
        env::var(key).unwrap_or_else(|_| default.to_string())
    }

    /// Get environment variable as u16 with default
    pub fn get_u16(key: &str, default: u16) -> u16 {
        env::var(key)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Get environment variable as i64 with default
    pub fn get_i64(key: &str, default: i64) -> i64 {
        env::var(key)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }
}

/// Configuration loading and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVariable(&'static str),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

/// Session token configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expires_hours: i64,
}

/// External place-search provider configuration
#[derive(Debug, Clone)]
pub struct PlacesConfig {
    pub api_key: String,
}

/// Application configuration combining all sections
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    /// Absent when no provider API key is configured; the search endpoints
    /// are then disabled.
    pub places: Option<PlacesConfig>,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let database =
            DatabaseConfig::from_env().map_err(|_| ConfigError::MissingVariable("DATABASE_URL"))?;

        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")
                .map_err(|_| ConfigError::MissingVariable("JWT_SECRET"))?,
            expires_hours: env::get_i64("JWT_EXPIRES_HOURS", 24),
        };

        let places = std::env::var("PLACES_API_KEY")
            .ok()
            .filter(|key| !key.is_empty())
            .map(|api_key| PlacesConfig { api_key });

        Ok(Self {
            server: ServerConfig {
                host: env::get_string("HOST", "0.0.0.0"),
                port: env::get_u16("PORT", 3000),
                log_level: env::get_string("RUST_LOG", "info"),
            },
            database,
            jwt,
            places,
        })
    }

    /// Reject configurations that cannot work at runtime
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.len() < 32 {
            return Err(ConfigError::Invalid(
                "JWT_SECRET must be at least 32 characters".to_string(),
            ));
        }
        if self.jwt.expires_hours <= 0 {
            return Err(ConfigError::Invalid(
                "JWT_EXPIRES_HOURS must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(secret: &str, expires_hours: i64) -> AppConfig {
        AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
                log_level: "info".to_string(),
            },
            database: DatabaseConfig::default(),
            jwt: JwtConfig {
                secret: secret.to_string(),
                expires_hours,
            },
            places: None,
        }
    }

    #[test]
    fn test_short_secret_rejected() {
        let config = test_config("short", 24);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_positive_expiry_rejected() {
        let config = test_config("0123456789abcdef0123456789abcdef", 0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_valid_config_accepted() {
        let config = test_config("0123456789abcdef0123456789abcdef", 24);
        assert!(config.validate().is_ok());
    }
}
