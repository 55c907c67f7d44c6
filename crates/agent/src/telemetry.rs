//! Tracing subscriber setup

use collections_agent_config::ObservabilityConfig;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

use crate::AgentError;

/// Install the global subscriber.
///
/// `RUST_LOG` wins over the configured level. Fails if a global subscriber is
/// already installed, which callers running several engines may ignore.
pub fn init_tracing(config: &ObservabilityConfig) -> Result<(), AgentError> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_directive(&config.log_level).into());

    let subscriber = tracing_subscriber::registry().with(env_filter);
    let fmt_layer = if config.log_json {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().boxed()
    };

    subscriber
        .with(fmt_layer)
        .try_init()
        .map_err(|e| AgentError::Initialization(format!("tracing: {}", e)))
}

fn default_directive(level: &str) -> String {
    format!("collections_agent={}", level)
}
