//! Conversation engine
//!
//! Drives one call through the stage graph:
//!
//! ```text
//! step:  handler(state) → render replies → apply update → route
//!         ↑                                                 │
//!         └──────────── Advanced ◄──────────────────────────┘
//!                        Suspended (awaiting customer)
//!                        Completed (terminal)
//! ```
//!
//! The engine owns the `CallState`. Callers feed customer replies through
//! `submit` and read agent lines from the transcript.

use std::sync::Arc;

use chrono::NaiveDate;
use collections_agent_config::Settings;
use collections_agent_core::{
    Amount, CallError, CallObserver, CallOutcome, CallSnapshot, CannedRenderer, CustomerDirectory,
    CustomerRecord, IntentClassifier, ResponseRenderer, Stage,
};
use collections_agent_text_processing::EntityExtractor;
use serde::{Deserialize, Serialize};

use crate::classifier::ChainedClassifier;
use crate::negotiation::PlanBuilder;
use crate::observer::TracingObserver;
use crate::router::{Route, Router};
use crate::stages::{StageRegistry, TurnContext};
use crate::state::{CallState, StateUpdate};
use crate::verification::VerificationEngine;

/// One edge taken through the stage graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageTransition {
    pub from: Stage,
    pub to: Stage,
}

/// Result of a single engine step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Moved to (or stayed in) a stage and can keep going
    Advanced { from: Stage, to: Stage },
    /// Waiting for the customer's next reply
    Suspended { stage: Stage },
    /// The call is over
    Completed { outcome: CallOutcome },
}

/// Step-wise driver for a single call
pub struct ConversationEngine {
    state: CallState,
    settings: Settings,
    router: Router,
    registry: StageRegistry,
    classifier: Arc<dyn IntentClassifier>,
    extractor: EntityExtractor,
    verifier: VerificationEngine,
    plans: PlanBuilder,
    renderer: Arc<dyn ResponseRenderer>,
    observers: Vec<Arc<dyn CallObserver>>,
    today: NaiveDate,
    transitions: Vec<StageTransition>,
}

impl ConversationEngine {
    /// Engine for a new call with the given customer
    pub fn new(customer: CustomerRecord, settings: &Settings) -> Self {
        Self::with_state(CallState::new(customer), settings)
    }

    /// Engine resuming an existing state, e.g. one restored from storage
    pub fn with_state(state: CallState, settings: &Settings) -> Self {
        Self {
            state,
            router: Router::new(settings.negotiation.clone()),
            registry: StageRegistry::new(),
            classifier: Arc::new(ChainedClassifier::new()),
            extractor: EntityExtractor::with_min_amount(Amount::from_rupees(
                settings.entities.min_ptp_amount_rupees,
            )),
            verifier: VerificationEngine::new(&settings.verification),
            plans: PlanBuilder::from_policy(&settings.negotiation),
            renderer: Arc::new(CannedRenderer),
            observers: vec![Arc::new(TracingObserver)],
            today: chrono::Local::now().date_naive(),
            transitions: Vec::new(),
            settings: settings.clone(),
        }
    }

    /// Look the customer up by phone and start an engine for them
    pub fn from_directory(
        directory: &dyn CustomerDirectory,
        phone: &str,
        settings: &Settings,
    ) -> Result<Self, CallError> {
        let customer = directory
            .find_by_phone(phone)
            .ok_or_else(|| CallError::CustomerNotFound(phone.to_string()))?;
        Ok(Self::new(customer, settings))
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn IntentClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_renderer(mut self, renderer: Arc<dyn ResponseRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    /// Add an observer next to the tracing one
    pub fn with_observer(mut self, observer: Arc<dyn CallObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Pin the calendar day used for relative dates
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn with_registry(mut self, registry: StageRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn state(&self) -> &CallState {
        &self.state
    }

    pub fn snapshot(&self) -> CallSnapshot {
        self.state.snapshot()
    }

    pub fn transitions(&self) -> &[StageTransition] {
        &self.transitions
    }

    pub fn is_complete(&self) -> bool {
        self.state.is_complete
    }

    pub fn outcome(&self) -> Option<CallOutcome> {
        self.state.call_outcome
    }

    /// Open the call and run until the customer has to answer
    pub fn start(&mut self) -> Result<StepOutcome, CallError> {
        if self.state.is_complete {
            return Err(self.reentry());
        }
        tracing::info!(
            call_id = %self.state.call_id,
            customer_id = %self.state.customer.customer_id,
            "Call started"
        );
        self.run_until_suspended()
    }

    /// Feed a customer reply and run until the next suspension
    pub fn submit(&mut self, input: &str) -> Result<StepOutcome, CallError> {
        if self.state.is_complete {
            return Err(self.reentry());
        }
        if input.trim().is_empty() {
            return Err(CallError::InputMissing);
        }
        if !self.state.awaiting_user {
            return Err(CallError::NotAwaitingInput {
                stage: self.state.stage,
            });
        }

        self.state.receive_input(input);
        tracing::debug!(
            call_id = %self.state.call_id,
            stage = self.state.stage.as_str(),
            turn = self.state.turn_count,
            "Customer input received"
        );
        self.run_until_suspended()
    }

    /// Step until suspended or complete, bounded by `engine.max_steps_per_turn`
    pub fn run_until_suspended(&mut self) -> Result<StepOutcome, CallError> {
        let limit = self.settings.engine.max_steps_per_turn;
        for _ in 0..limit {
            match self.step()? {
                StepOutcome::Advanced { .. } => continue,
                done => return Ok(done),
            }
        }

        tracing::error!(
            call_id = %self.state.call_id,
            stage = self.state.stage.as_str(),
            limit,
            "Step limit reached without suspending"
        );
        Err(CallError::StepLimitExceeded { limit })
    }

    /// Run the current stage's handler once and route
    pub fn step(&mut self) -> Result<StepOutcome, CallError> {
        if self.state.is_complete {
            return Err(self.reentry());
        }
        if self.state.awaiting_user {
            return Ok(StepOutcome::Suspended {
                stage: self.state.stage,
            });
        }

        let stage = self.state.stage;
        let update = self.run_handler(stage)?;
        let update = self.render(update);

        if let Err(e) = self.state.apply(update) {
            tracing::warn!(
                call_id = %self.state.call_id,
                stage = stage.as_str(),
                error = %e,
                "Update rejected"
            );
            return Err(e);
        }

        let snapshot = self.state.snapshot();
        for observer in &self.observers {
            observer.on_update(&snapshot);
        }

        if self.state.is_complete {
            for observer in &self.observers {
                observer.on_complete(&snapshot);
            }
            return self
                .state
                .call_outcome
                .map(|outcome| StepOutcome::Completed { outcome })
                .ok_or_else(|| {
                    CallError::InvariantViolation("complete without outcome".to_string())
                });
        }
        if self.state.awaiting_user {
            return Ok(StepOutcome::Suspended { stage });
        }

        match self.router.next(stage, &self.state) {
            Route::Terminal => Err(CallError::InvariantViolation(format!(
                "stage {} ended the call without an outcome",
                stage
            ))),
            Route::Stage(next) => {
                if next != stage {
                    self.transitions.push(StageTransition { from: stage, to: next });
                    for observer in &self.observers {
                        observer.on_transition(&self.state.call_id, stage, next);
                    }
                    self.state.stage = next;
                }
                Ok(StepOutcome::Advanced {
                    from: stage,
                    to: next,
                })
            }
        }
    }

    fn run_handler(&self, stage: Stage) -> Result<StateUpdate, CallError> {
        let handler = self.registry.get(stage).ok_or_else(|| {
            CallError::InvariantViolation(format!("no handler registered for stage {}", stage))
        })?;

        let ctx = TurnContext {
            settings: &self.settings,
            classifier: self.classifier.as_ref(),
            extractor: &self.extractor,
            verifier: &self.verifier,
            plans: &self.plans,
            today: self.today,
        };
        Ok(handler.handle(&self.state, &ctx))
    }

    /// Let the renderer reword replies; nothing else in the update changes
    fn render(&self, mut update: StateUpdate) -> StateUpdate {
        if update.replies.is_empty() {
            return update;
        }
        let snapshot = self.state.snapshot();
        for reply in &mut update.replies {
            if let Some(text) = self.renderer.rephrase(reply, &snapshot) {
                if !text.trim().is_empty() {
                    reply.text = text;
                }
            }
        }
        update
    }

    fn reentry(&self) -> CallError {
        CallError::InvalidStageReentry {
            call_id: self.state.call_id.clone(),
        }
    }
}

impl std::fmt::Debug for ConversationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversationEngine")
            .field("call_id", &self.state.call_id)
            .field("stage", &self.state.stage)
            .field("is_complete", &self.state.is_complete)
            .field("transitions", &self.transitions.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stages::test_support::{customer, today};
    use crate::stages::StageHandler;
    use collections_agent_core::{PaymentStatus, Speaker};

    fn engine() -> ConversationEngine {
        ConversationEngine::new(customer(), &Settings::default()).with_today(today())
    }

    #[test]
    fn test_start_greets_and_suspends() {
        let mut engine = engine();
        assert_eq!(
            engine.start().unwrap(),
            StepOutcome::Suspended {
                stage: Stage::Greeting
            }
        );

        let state = engine.state();
        assert_eq!(state.stage, Stage::Greeting);
        assert!(state.awaiting_user);
        assert_eq!(state.messages().len(), 1);
        assert!(state.messages()[0].text.starts_with("Hello Rajesh"));
    }

    #[test]
    fn test_submit_before_start_is_rejected() {
        let mut engine = engine();
        assert_eq!(
            engine.submit("hello"),
            Err(CallError::NotAwaitingInput {
                stage: Stage::Greeting
            })
        );
        assert!(engine.state().messages().is_empty());
    }

    #[test]
    fn test_blank_input_changes_nothing() {
        let mut engine = engine();
        engine.start().unwrap();
        let before = engine.state().clone();

        assert_eq!(engine.submit("   "), Err(CallError::InputMissing));
        assert_eq!(engine.state(), &before);
    }

    #[test]
    fn test_step_while_awaiting_is_suspended() {
        let mut engine = engine();
        engine.start().unwrap();
        assert_eq!(
            engine.step().unwrap(),
            StepOutcome::Suspended {
                stage: Stage::Greeting
            }
        );
        assert_eq!(engine.state().messages().len(), 1);
    }

    #[test]
    fn test_verification_reached_after_greeting() {
        let mut engine = engine();
        engine.start().unwrap();
        engine.submit("Yes speaking").unwrap();

        let state = engine.state();
        assert_eq!(state.stage, Stage::Verification);
        assert_eq!(
            engine.transitions(),
            &[StageTransition {
                from: Stage::Greeting,
                to: Stage::Verification
            }]
        );
        let last = state.last_agent_message().unwrap();
        assert_eq!(last.speaker, Speaker::Agent);
        assert!(last.text.contains("date of birth"));
    }

    #[test]
    fn test_paid_call_completes() {
        let mut engine = engine();
        engine.start().unwrap();
        engine.submit("yes").unwrap();
        engine.submit("15/03/1985").unwrap();
        let outcome = engine.submit("I already paid yesterday").unwrap();

        assert_eq!(
            outcome,
            StepOutcome::Completed {
                outcome: CallOutcome::Paid
            }
        );
        assert!(engine.is_complete());
        assert_eq!(engine.outcome(), Some(CallOutcome::Paid));
        assert_eq!(engine.state().payment_status, PaymentStatus::Paid);
        assert!(engine.state().call_summary.is_some());
        assert!(matches!(
            engine.submit("hello?"),
            Err(CallError::InvalidStageReentry { .. })
        ));
        assert!(matches!(
            engine.start(),
            Err(CallError::InvalidStageReentry { .. })
        ));
    }

    #[test]
    fn test_step_limit() {
        // A handler that never waits and never finishes loops in place
        struct Spin;
        impl StageHandler for Spin {
            fn stage(&self) -> Stage {
                Stage::Greeting
            }
            fn handle(&self, _state: &CallState, _ctx: &TurnContext<'_>) -> StateUpdate {
                StateUpdate::new()
            }
        }

        let mut engine =
            engine().with_registry(StageRegistry::new().with_handler(Box::new(Spin)));
        assert_eq!(
            engine.start(),
            Err(CallError::StepLimitExceeded {
                limit: Settings::default().engine.max_steps_per_turn
            })
        );
    }

    #[test]
    fn test_rejected_update_leaves_state_untouched() {
        // Claims an outcome outside the closing stage
        struct Rogue;
        impl StageHandler for Rogue {
            fn stage(&self) -> Stage {
                Stage::Greeting
            }
            fn handle(&self, _state: &CallState, _ctx: &TurnContext<'_>) -> StateUpdate {
                StateUpdate::new().complete(CallOutcome::Paid, "done".to_string())
            }
        }

        let mut engine =
            engine().with_registry(StageRegistry::new().with_handler(Box::new(Rogue)));
        let before = engine.state().clone();
        assert!(matches!(
            engine.start(),
            Err(CallError::InvariantViolation(_))
        ));
        assert_eq!(engine.state(), &before);
    }

    #[test]
    fn test_from_directory_unknown_phone() {
        let directory = crate::StaticCustomerDirectory::new(vec![customer()]);
        let result =
            ConversationEngine::from_directory(&directory, "+910000000000", &Settings::default());
        assert!(matches!(result, Err(CallError::CustomerNotFound(_))));

        let engine =
            ConversationEngine::from_directory(&directory, "9876543210", &Settings::default())
                .unwrap();
        assert_eq!(engine.state().customer.customer_id, "CUST001");
    }
}
