//! Core traits and types for the collections call agent
//!
//! This crate provides foundational types used across all other crates:
//! - Conversation stages, transcript messages, intents and outcomes
//! - Customer records and money amounts
//! - Collaborator traits (classifier, directory, renderer, observer)
//! - Error types

pub mod conversation;
pub mod customer;
pub mod error;
pub mod traits;

pub use conversation::{
    CallOutcome, CallSnapshot, Message, PaymentStatus, Reply, ReplyKind, Speaker, Stage,
};
pub use customer::{Amount, CustomerRecord};
pub use error::{CallError, Result};

pub use traits::{
    CallObserver, CannedRenderer, CustomerDirectory, IntentClassifier, ResponseRenderer,
};
