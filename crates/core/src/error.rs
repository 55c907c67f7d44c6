//! Call-level error type

use thiserror::Error;

use crate::conversation::Stage;

/// Errors returned to the driving loop.
///
/// None of these leave a call half-updated: the engine rejects the request
/// before touching state, or discards the whole update.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CallError {
    #[error("Input expected but none supplied")]
    InputMissing,

    #[error("Call {call_id} is already complete")]
    InvalidStageReentry { call_id: String },

    #[error("Not waiting for input in stage {stage}")]
    NotAwaitingInput { stage: Stage },

    #[error("No customer found for phone {0}")]
    CustomerNotFound(String),

    #[error("State update rejected: {0}")]
    InvariantViolation(String),

    #[error("Turn exceeded {limit} stage steps")]
    StepLimitExceeded { limit: usize },
}

pub type Result<T> = std::result::Result<T, CallError>;
