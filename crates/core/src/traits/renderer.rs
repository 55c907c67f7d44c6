//! Optional text rendering for agent replies

use crate::conversation::{CallSnapshot, Reply};

/// Rephrases canned replies, e.g. through a language model.
///
/// Returning `None` keeps the canned text. Implementations only affect the
/// wording that ends up in the transcript; they cannot change any state field
/// or routing decision.
pub trait ResponseRenderer: Send + Sync {
    fn rephrase(&self, reply: &Reply, snapshot: &CallSnapshot) -> Option<String>;
}

/// Renderer that always keeps the canned text
#[derive(Debug, Clone, Copy, Default)]
pub struct CannedRenderer;

impl ResponseRenderer for CannedRenderer {
    fn rephrase(&self, _reply: &Reply, _snapshot: &CallSnapshot) -> Option<String> {
        None
    }
}
