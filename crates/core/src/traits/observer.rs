//! Observability hooks

use crate::conversation::{CallSnapshot, Stage};

/// Receives stage transitions and state snapshots for tracing or evaluation.
///
/// All methods default to no-ops so observers implement only what they need.
pub trait CallObserver: Send + Sync {
    /// The router moved the call from one stage to another
    fn on_transition(&self, _call_id: &str, _from: Stage, _to: Stage) {}

    /// A handler's update was merged
    fn on_update(&self, _snapshot: &CallSnapshot) {}

    /// The call reached a terminal state
    fn on_complete(&self, _snapshot: &CallSnapshot) {}
}
