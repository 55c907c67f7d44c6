//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::constants::limits;
use crate::{
    AgentSettings, ConfigError, EngineSettings, EntitySettings, NegotiationPolicy,
    PaymentCheckSettings, VerificationSettings,
};

/// Prefix for environment variable overrides, e.g.
/// `COLLECTIONS_AGENT__NEGOTIATION__NEGOTIATE_WILLING=false`
pub const ENV_PREFIX: &str = "COLLECTIONS_AGENT";

/// Deployment label carried in the settings file and in the load log.
/// It does not change validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    #[default]
    Development,
    Staging,
    Production,
}

impl RuntimeEnvironment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Staging => "staging",
            Self::Production => "production",
        }
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    #[serde(default)]
    pub agent: AgentSettings,

    #[serde(default)]
    pub verification: VerificationSettings,

    #[serde(default)]
    pub payment_check: PaymentCheckSettings,

    #[serde(default)]
    pub negotiation: NegotiationPolicy,

    #[serde(default)]
    pub entities: EntitySettings,

    #[serde(default)]
    pub engine: EngineSettings,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Settings {
    /// Create default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_agent()?;
        self.validate_negotiation()?;
        self.validate_limits()?;
        Ok(())
    }

    fn validate_agent(&self) -> Result<(), ConfigError> {
        if self.agent.company_name.trim().is_empty() {
            return Err(ConfigError::MissingField("agent.company_name".to_string()));
        }
        if self.agent.agent_name.trim().is_empty() {
            return Err(ConfigError::MissingField("agent.agent_name".to_string()));
        }
        Ok(())
    }

    fn validate_negotiation(&self) -> Result<(), ConfigError> {
        let policy = &self.negotiation;

        if policy.settlement_discount_percent > limits::MAX_SETTLEMENT_DISCOUNT_PERCENT {
            return Err(ConfigError::InvalidValue {
                field: "negotiation.settlement_discount_percent".to_string(),
                message: format!(
                    "Must be at most {}, got {}",
                    limits::MAX_SETTLEMENT_DISCOUNT_PERCENT,
                    policy.settlement_discount_percent
                ),
            });
        }

        if policy.installment_months.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "negotiation.installment_months".to_string(),
                message: "At least one instalment plan is required".to_string(),
            });
        }

        let range = limits::MIN_INSTALLMENT_MONTHS..=limits::MAX_INSTALLMENT_MONTHS;
        if let Some(bad) = policy
            .installment_months
            .iter()
            .find(|months| !range.contains(months))
        {
            return Err(ConfigError::InvalidValue {
                field: "negotiation.installment_months".to_string(),
                message: format!(
                    "Must be between {} and {} months, got {}",
                    limits::MIN_INSTALLMENT_MONTHS,
                    limits::MAX_INSTALLMENT_MONTHS,
                    bad
                ),
            });
        }

        Ok(())
    }

    fn validate_limits(&self) -> Result<(), ConfigError> {
        if self.payment_check.max_clarifications > limits::MAX_CLARIFICATIONS {
            return Err(ConfigError::InvalidValue {
                field: "payment_check.max_clarifications".to_string(),
                message: format!(
                    "Must be at most {}, got {}",
                    limits::MAX_CLARIFICATIONS,
                    self.payment_check.max_clarifications
                ),
            });
        }

        if self.engine.max_steps_per_turn < limits::MIN_STEPS_PER_TURN {
            return Err(ConfigError::InvalidValue {
                field: "engine.max_steps_per_turn".to_string(),
                message: format!(
                    "Must be at least {}, got {}",
                    limits::MIN_STEPS_PER_TURN,
                    self.engine.max_steps_per_turn
                ),
            });
        }

        if self.entities.min_ptp_amount_rupees < 0 {
            return Err(ConfigError::InvalidValue {
                field: "entities.min_ptp_amount_rupees".to_string(),
                message: "Must not be negative".to_string(),
            });
        }

        Ok(())
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub log_json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
        }
    }
}

fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("negotiation.installment_months")
}

/// Load settings from files and environment
///
/// Priority (highest to lowest):
/// 1. Environment variables (COLLECTIONS_AGENT prefix)
/// 2. config/{env}.{yaml,toml,json} (if env specified)
/// 3. config/default.{yaml,toml,json}
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    builder = builder.add_source(File::with_name("config/default").required(false));

    if let Some(env_name) = env {
        builder =
            builder.add_source(File::with_name(&format!("config/{}", env_name)).required(false));
    }

    builder = builder.add_source(env_source());

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;

    tracing::debug!(
        environment = settings.environment.as_str(),
        config_env = env.unwrap_or("default"),
        "Settings loaded"
    );

    Ok(settings)
}

/// Load settings from a single file (format chosen by extension)
pub fn load_settings_from(path: &Path) -> Result<Settings, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let config = Config::builder().add_source(File::from(path)).build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;

    Ok(settings)
}
