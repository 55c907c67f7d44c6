//! Stage handlers
//!
//! One handler per conversation stage. A handler reads the call state and
//! returns a `StateUpdate`; it never changes the stage itself; the engine
//! does that through the router once the update has been merged.
//!
//! A handler that needs the customer to answer sets `awaiting_user`, which
//! suspends the engine until the next reply is submitted. The reply arrives
//! as `last_user_input` and the handler that uses it consumes it.

mod closing;
mod disclosure;
mod greeting;
mod negotiation;
mod payment_check;
mod verification;

pub use closing::{call_summary, ClosingHandler};
pub use disclosure::DisclosureHandler;
pub use greeting::GreetingHandler;
pub use negotiation::NegotiationHandler;
pub use payment_check::PaymentCheckHandler;
pub use verification::VerificationHandler;

use chrono::NaiveDate;
use collections_agent_config::Settings;
use collections_agent_core::{IntentClassifier, Stage};
use collections_agent_text_processing::EntityExtractor;

use crate::negotiation::PlanBuilder;
use crate::state::{CallState, StateUpdate};
use crate::verification::VerificationEngine;

/// Collaborators and settings available to handlers during one step
pub struct TurnContext<'a> {
    pub settings: &'a Settings,
    pub classifier: &'a dyn IntentClassifier,
    pub extractor: &'a EntityExtractor,
    pub verifier: &'a VerificationEngine,
    pub plans: &'a PlanBuilder,
    /// Calendar day relative dates are resolved against
    pub today: NaiveDate,
}

/// Logic for one conversation stage
pub trait StageHandler: Send + Sync {
    /// Stage this handler runs in
    fn stage(&self) -> Stage;

    /// Compute the changes for the current state
    fn handle(&self, state: &CallState, ctx: &TurnContext<'_>) -> StateUpdate;
}

/// Handler lookup by stage
pub struct StageRegistry {
    handlers: Vec<Box<dyn StageHandler>>,
}

impl Default for StageRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl StageRegistry {
    /// Registry with the built-in handler for every stage
    pub fn new() -> Self {
        Self {
            handlers: vec![
                Box::new(GreetingHandler),
                Box::new(VerificationHandler),
                Box::new(DisclosureHandler),
                Box::new(PaymentCheckHandler),
                Box::new(NegotiationHandler),
                Box::new(ClosingHandler),
            ],
        }
    }

    /// Replace the handler for `handler.stage()`
    pub fn with_handler(mut self, handler: Box<dyn StageHandler>) -> Self {
        self.handlers.retain(|h| h.stage() != handler.stage());
        self.handlers.push(handler);
        self
    }

    pub fn get(&self, stage: Stage) -> Option<&dyn StageHandler> {
        self.handlers
            .iter()
            .find(|h| h.stage() == stage)
            .map(|h| h.as_ref())
    }
}

/// "5 March 2026"
pub(crate) fn spoken_date(date: NaiveDate) -> String {
    date.format("%-d %B %Y").to_string()
}
