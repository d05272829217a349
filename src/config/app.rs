//! Main application configuration
//!
//! This module defines the primary configuration structures for the team-mixer
//! service, including environment variable loading, TOML file loading and
//! validation.

use crate::config::mix::MixSettings;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub mix: MixSettings,
}

/// Service-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Service name for logging and metrics
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Port for the HTTP API and health check endpoints
    pub http_port: u16,
    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout_seconds: u64,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "team-mixer".to_string(),
            log_level: "info".to_string(),
            http_port: 8080,
            shutdown_timeout_seconds: 30,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        // Service settings
        if let Ok(name) = env::var("SERVICE_NAME") {
            config.service.name = name;
        }
        if let Ok(log_level) = env::var("LOG_LEVEL") {
            config.service.log_level = log_level;
        }
        if let Ok(port) = env::var("HTTP_PORT") {
            config.service.http_port = port
                .parse()
                .map_err(|_| anyhow!("Invalid HTTP_PORT value: {}", port))?;
        }
        if let Ok(timeout) = env::var("SHUTDOWN_TIMEOUT_SECONDS") {
            config.service.shutdown_timeout_seconds = timeout
                .parse()
                .map_err(|_| anyhow!("Invalid SHUTDOWN_TIMEOUT_SECONDS value: {}", timeout))?;
        }

        // Mix settings
        if let Ok(team_size) = env::var("TEAM_SIZE") {
            config.mix.team_size = team_size
                .parse()
                .map_err(|_| anyhow!("Invalid TEAM_SIZE value: {}", team_size))?;
        }
        if let Ok(ttl) = env::var("SESSION_TTL_SECONDS") {
            config.mix.session_ttl_seconds = ttl
                .parse()
                .map_err(|_| anyhow!("Invalid SESSION_TTL_SECONDS value: {}", ttl))?;
        }
        if let Ok(max_sessions) = env::var("MAX_SESSIONS") {
            config.mix.max_sessions = max_sessions
                .parse()
                .map_err(|_| anyhow!("Invalid MAX_SESSIONS value: {}", max_sessions))?;
        }
        if let Ok(interval) = env::var("PRUNE_INTERVAL_SECONDS") {
            config.mix.prune_interval_seconds = interval
                .parse()
                .map_err(|_| anyhow!("Invalid PRUNE_INTERVAL_SECONDS value: {}", interval))?;
        }

        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        validate_config(&config)?;
        Ok(config)
    }

    /// Get shutdown timeout as Duration
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.service.shutdown_timeout_seconds)
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    // Validate log level
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    // Validate ports
    if config.service.http_port == 0 {
        return Err(anyhow!("HTTP port cannot be 0"));
    }

    // Validate timeouts
    if config.service.shutdown_timeout_seconds == 0 {
        return Err(anyhow!("Shutdown timeout must be greater than 0"));
    }

    // Validate mix settings
    if config.mix.team_size == 0 {
        return Err(anyhow!("Team size must be greater than 0"));
    }
    if config.mix.max_sessions == 0 {
        return Err(anyhow!("Max sessions must be greater than 0"));
    }
    if config.mix.session_ttl_seconds == 0 {
        return Err(anyhow!("Session TTL must be greater than 0"));
    }
    if config.mix.prune_interval_seconds == 0 {
        return Err(anyhow!("Prune interval must be greater than 0"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
        assert_eq!(config.mix.team_size, 5);
        assert_eq!(config.mix.max_playable(), 10);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let mut config = AppConfig::default();
        config.service.log_level = "loud".to_string();
        assert!(validate_config(&config).is_err());

        let mut config = AppConfig::default();
        config.mix.team_size = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [mix]
            team_size = 6
            "#,
        )
        .unwrap();

        assert_eq!(config.mix.team_size, 6);
        assert_eq!(config.mix.max_playable(), 12);
        assert_eq!(config.service.http_port, 8080);
        assert_eq!(config.mix.max_sessions, 1000);
    }
}
