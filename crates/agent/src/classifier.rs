//! Ordered classifier chain
//!
//! The rule-based classifier always runs first. Additional classifiers (for
//! example a model-backed one supplied by the embedding application) are only
//! consulted when every earlier one returned `PaymentStatus::None`.

use std::sync::Arc;

use collections_agent_core::{IntentClassifier, PaymentStatus};
use collections_agent_text_processing::RuleBasedClassifier;

/// First non-`None` answer wins
#[derive(Clone)]
pub struct ChainedClassifier {
    chain: Vec<Arc<dyn IntentClassifier>>,
}

impl Default for ChainedClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ChainedClassifier {
    /// Chain holding only the rule-based classifier
    pub fn new() -> Self {
        Self {
            chain: vec![Arc::new(RuleBasedClassifier::new())],
        }
    }

    /// Append a fallback classifier
    pub fn with_fallback(mut self, classifier: Arc<dyn IntentClassifier>) -> Self {
        self.chain.push(classifier);
        self
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }
}

impl std::fmt::Debug for ChainedClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.chain.iter().map(|c| c.name()).collect();
        f.debug_struct("ChainedClassifier")
            .field("chain", &names)
            .finish()
    }
}

impl IntentClassifier for ChainedClassifier {
    fn classify(&self, utterance: &str) -> PaymentStatus {
        for classifier in &self.chain {
            let status = classifier.classify(utterance);
            if status.is_known() {
                tracing::debug!(
                    classifier = classifier.name(),
                    status = %status,
                    "Payment intent classified"
                );
                return status;
            }
        }
        PaymentStatus::None
    }

    fn name(&self) -> &str {
        "chain"
    }
}
