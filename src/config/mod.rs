//! Configuration management for the team-mixer service
//!
//! This module handles all configuration loading from environment variables,
//! TOML files, validation, and default values for the mixing service.

pub mod app;
pub mod mix;

// Re-export commonly used types
pub use app::{validate_config, AppConfig, ServiceSettings};
pub use mix::MixSettings;
