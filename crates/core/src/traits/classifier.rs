//! Payment intent classification trait

use std::sync::Arc;

use crate::conversation::PaymentStatus;

/// Classifies a customer utterance into a payment intent.
///
/// Implementations must be deterministic for a given input and must not keep
/// hidden state between calls. `PaymentStatus::None` means "nothing
/// recognisable", which callers treat as ambiguity rather than an error.
///
/// # Example
///
/// ```ignore
/// struct AlwaysPaid;
///
/// impl IntentClassifier for AlwaysPaid {
///     fn classify(&self, _utterance: &str) -> PaymentStatus {
///         PaymentStatus::Paid
///     }
/// }
/// ```
pub trait IntentClassifier: Send + Sync {
    /// Classify one utterance
    fn classify(&self, utterance: &str) -> PaymentStatus;

    /// Short name used in logs
    fn name(&self) -> &str {
        "classifier"
    }
}

impl<T: IntentClassifier + ?Sized> IntentClassifier for Arc<T> {
    fn classify(&self, utterance: &str) -> PaymentStatus {
        (**self).classify(utterance)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
