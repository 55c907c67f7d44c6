//! Debt collection call agent
//!
//! Features:
//! - Stage-based call flow: greeting, verification, disclosure, payment
//!   check, negotiation, closing
//! - Typed state updates merged atomically into a single call record
//! - Deterministic routing with a configurable negotiation policy
//! - Step-wise engine that suspends whenever the customer has to answer
//! - Pluggable classification, rendering, lookup and observation

pub mod classifier;
pub mod directory;
pub mod engine;
pub mod negotiation;
pub mod observer;
pub mod router;
pub mod stages;
pub mod state;
pub mod telemetry;
pub mod verification;

pub use classifier::ChainedClassifier;
pub use directory::StaticCustomerDirectory;
pub use engine::{ConversationEngine, StageTransition, StepOutcome};
pub use negotiation::{PaymentPlan, PlanBuilder, PlanKind};
pub use observer::{RecordingObserver, TracingObserver};
pub use router::{Route, Router};
pub use stages::{StageHandler, StageRegistry, TurnContext};
pub use state::{CallState, StateUpdate};
pub use telemetry::init_tracing;
pub use verification::VerificationEngine;

pub use collections_agent_core::{CallError, CallOutcome, PaymentStatus, Stage};

use thiserror::Error;

/// Agent errors
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Call error: {0}")]
    Call(#[from] CallError),

    #[error("Configuration error: {0}")]
    Config(#[from] collections_agent_config::ConfigError),

    #[error("Directory error: {0}")]
    Directory(String),

    #[error("Initialization error: {0}")]
    Initialization(String),
}

impl From<serde_yaml::Error> for AgentError {
    fn from(err: serde_yaml::Error) -> Self {
        AgentError::Directory(err.to_string())
    }
}

impl From<std::io::Error> for AgentError {
    fn from(err: std::io::Error) -> Self {
        AgentError::Directory(err.to_string())
    }
}
