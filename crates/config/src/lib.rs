//! Configuration management for the collections call agent
//!
//! Supports loading configuration from:
//! - YAML/TOML/JSON files (`config/default`, `config/{env}`)
//! - Environment variables (COLLECTIONS_AGENT prefix, `__` separator)
//!
//! Everything has a default, so `Settings::default()` is a complete,
//! valid configuration.

pub mod agent;
pub mod constants;
pub mod settings;

pub use agent::{
    AgentSettings, EngineSettings, EntitySettings, NegotiationPolicy, PaymentCheckSettings,
    VerificationSettings,
};
pub use settings::{
    load_settings, load_settings_from, ObservabilityConfig, RuntimeEnvironment, Settings,
    ENV_PREFIX,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
