//! Call observers
//!
//! - `TracingObserver` emits structured tracing events
//! - `RecordingObserver` keeps every event in memory for evaluation harnesses

use collections_agent_core::{CallObserver, CallSnapshot, Stage};
use parking_lot::Mutex;

/// Logs transitions and completions through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl CallObserver for TracingObserver {
    fn on_transition(&self, call_id: &str, from: Stage, to: Stage) {
        tracing::info!(
            call_id,
            from = from.as_str(),
            to = to.as_str(),
            "Stage transition"
        );
    }

    fn on_update(&self, snapshot: &CallSnapshot) {
        tracing::debug!(
            call_id = %snapshot.call_id,
            stage = snapshot.stage.as_str(),
            awaiting_user = snapshot.awaiting_user,
            verification_attempts = snapshot.verification_attempts,
            is_verified = snapshot.is_verified,
            payment_status = snapshot.payment_status.as_str(),
            messages = snapshot.message_count,
            "State updated"
        );
    }

    fn on_complete(&self, snapshot: &CallSnapshot) {
        tracing::info!(
            call_id = %snapshot.call_id,
            customer_id = %snapshot.customer_id,
            outcome = snapshot.call_outcome.map(|o| o.as_str()).unwrap_or("none"),
            verification_attempts = snapshot.verification_attempts,
            disclosure_done = snapshot.disclosure_done,
            negotiation_offered = snapshot.negotiation_offered,
            "Call complete"
        );
    }
}

/// Event captured by `RecordingObserver`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObservedEvent {
    Transition { from: Stage, to: Stage },
    Update(CallSnapshot),
    Complete(CallSnapshot),
}

/// Stores every event in order
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<ObservedEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ObservedEvent> {
        self.events.lock().clone()
    }

    /// Stage path taken, e.g. greeting → verification → ...
    pub fn transitions(&self) -> Vec<(Stage, Stage)> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                ObservedEvent::Transition { from, to } => Some((*from, *to)),
                _ => None,
            })
            .collect()
    }

    pub fn snapshots(&self) -> Vec<CallSnapshot> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                ObservedEvent::Update(snapshot) => Some(snapshot.clone()),
                _ => None,
            })
            .collect()
    }

    /// Final snapshot, once the call ended
    pub fn completed(&self) -> Option<CallSnapshot> {
        self.events.lock().iter().rev().find_map(|e| match e {
            ObservedEvent::Complete(snapshot) => Some(snapshot.clone()),
            _ => None,
        })
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl CallObserver for RecordingObserver {
    fn on_transition(&self, _call_id: &str, from: Stage, to: Stage) {
        self.events
            .lock()
            .push(ObservedEvent::Transition { from, to });
    }

    fn on_update(&self, snapshot: &CallSnapshot) {
        self.events
            .lock()
            .push(ObservedEvent::Update(snapshot.clone()));
    }

    fn on_complete(&self, snapshot: &CallSnapshot) {
        self.events
            .lock()
            .push(ObservedEvent::Complete(snapshot.clone()));
    }
}
