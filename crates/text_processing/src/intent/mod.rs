//! Payment intent rules
//!
//! Maps a customer reply to a `PaymentStatus` with fixed phrase tables checked
//! in priority order: paid, disputed, callback, unable, willing. The first
//! table containing a phrase of the reply wins. Callback is checked before
//! either payment table, so "call me back, I will pay next week" is a
//! callback request.
//!
//! When no table matches, a fallback pass looks for bare incapacity words
//! (unable) and then affirmative or payment words (willing). Anything else is
//! `PaymentStatus::None`.
//!
//! # Example
//!
//! ```
//! use collections_agent_core::{IntentClassifier, PaymentStatus};
//! use collections_agent_text_processing::RuleBasedClassifier;
//!
//! let classifier = RuleBasedClassifier::new();
//! assert_eq!(
//!     classifier.classify("can you call me back tomorrow"),
//!     PaymentStatus::Callback
//! );
//! ```

use collections_agent_core::{IntentClassifier, PaymentStatus};

use crate::normalize::{contains_phrase, normalize_utterance};

const PAID_PHRASES: &[&str] = &[
    "already paid",
    "already made payment",
    "already made the payment",
    "already cleared",
    "already settled",
    "i paid",
    "i've paid",
    "i have paid",
    "i made the payment",
    "i made payment",
    "payment done",
    "payment made",
    "payment is done",
    "payment was made",
    "payment completed",
    "paid last week",
    "paid yesterday",
    "paid today",
    "just paid",
    "made the payment",
    "cleared my dues",
    "paid my dues",
    "settled my account",
    "sent the money",
    "transferred the amount",
];

const DISPUTED_PHRASES: &[&str] = &[
    "never took",
    "never borrowed",
    "never applied",
    "never signed",
    "didn't take",
    "didnt take",
    "haven't taken",
    "not my loan",
    "not my account",
    "not my debt",
    "not mine",
    "not me",
    "wrong person",
    "someone else",
    "don't owe",
    "dont owe",
    "do not owe",
    "this is wrong",
    "this is incorrect",
    "amount is wrong",
    "seems wrong",
    "identity theft",
    "fraud",
    "fraudulent",
    "unauthorized",
    "this is a mistake",
    "it's a mistake",
    "must be a mistake",
    "billing mistake",
    "billing error",
    "dispute",
    "disputed",
];

const CALLBACK_PHRASES: &[&str] = &[
    "call me back",
    "call back",
    "callback",
    "call me later",
    "call later",
    "call me tomorrow",
    "call me next week",
    "call me next month",
    "call me some other time",
    "call you back",
    "please call later",
    "busy now",
    "busy right now",
    "busy at the moment",
    "not available",
    "not a good time",
    "isn't a good time",
    "bad time",
    "can't talk now",
    "cant talk now",
    "cannot talk now",
    "can't talk right now",
    "driving right now",
    "driving at the moment",
    "i'm driving now",
    "in a meeting",
    "out of town",
    "talk later",
];

const UNABLE_PHRASES: &[&str] = &[
    "can't pay",
    "cant pay",
    "cannot pay",
    "can not pay",
    "unable to pay",
    "not able to pay",
    "won't be able to pay",
    "won't pay",
    "will not pay",
    "refuse to pay",
    "can't afford",
    "cant afford",
    "cannot afford",
    "unable to afford",
    "lost my job",
    "lost job",
    "no job",
    "unemployed",
    "jobless",
    "no money",
    "don't have money",
    "dont have money",
    "do not have money",
    "don't have the money",
    "dont have the money",
    "do not have the money",
    "no funds",
    "no income",
    "no salary",
    "out of money",
    "broke",
    "financial crisis",
    "financial difficulty",
    "financial trouble",
    "struggling",
    "hard time",
    "tough time",
    "medical emergency",
    "family emergency",
];

const WILLING_PHRASES: &[&str] = &[
    "i will pay",
    "i'll pay",
    "will pay",
    "can pay",
    "i can pay",
    "promise to pay",
    "pay next month",
    "pay next week",
    "pay tomorrow",
    "pay later",
    "pay in installments",
    "pay in parts",
    "pay some",
    "pay part",
    "partial payment",
    "installment",
    "installments",
    "instalment",
    "instalments",
    "emi",
    "payment plan",
    "monthly payment",
    "per month",
    "work something out",
    "work out a plan",
    "want to settle",
    "want to clear",
    "settle",
    "can manage",
    "can arrange",
];

/// Bare words signalling incapacity when no table phrase matched
const INCAPACITY_WORDS: &[&str] = &[
    "can't",
    "cant",
    "cannot",
    "unable",
    "impossible",
    "won't",
    "difficult",
    "don't have",
    "dont have",
    "do not have",
    "not able",
    "no way",
    "not possible",
];

/// Bare affirmative or payment words when no table phrase matched
const AFFIRMATIVE_WORDS: &[&str] = &[
    "yes",
    "yeah",
    "yep",
    "sure",
    "ok",
    "okay",
    "fine",
    "alright",
    "agree",
    "definitely",
    "pay",
    "payment",
];

/// Tables in the order they are checked
const PRIORITY: [(PaymentStatus, &[&str]); 5] = [
    (PaymentStatus::Paid, PAID_PHRASES),
    (PaymentStatus::Disputed, DISPUTED_PHRASES),
    (PaymentStatus::Callback, CALLBACK_PHRASES),
    (PaymentStatus::Unable, UNABLE_PHRASES),
    (PaymentStatus::Willing, WILLING_PHRASES),
];

/// Classification result with the phrase that decided it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntentMatch {
    pub status: PaymentStatus,
    /// Matched phrase or fallback word, `None` when nothing matched
    pub matched: Option<&'static str>,
}

impl IntentMatch {
    fn none() -> Self {
        Self {
            status: PaymentStatus::None,
            matched: None,
        }
    }
}

/// Deterministic phrase-table classifier
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedClassifier;

impl RuleBasedClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify and report which phrase decided the result
    pub fn classify_detailed(&self, utterance: &str) -> IntentMatch {
        let normalized = normalize_utterance(utterance);
        if normalized.is_empty() {
            return IntentMatch::none();
        }

        for (status, phrases) in PRIORITY {
            if let Some(phrase) = first_match(&normalized, phrases) {
                return IntentMatch {
                    status,
                    matched: Some(phrase),
                };
            }
        }

        if let Some(word) = first_match(&normalized, INCAPACITY_WORDS) {
            return IntentMatch {
                status: PaymentStatus::Unable,
                matched: Some(word),
            };
        }

        if let Some(word) = first_match(&normalized, AFFIRMATIVE_WORDS) {
            return IntentMatch {
                status: PaymentStatus::Willing,
                matched: Some(word),
            };
        }

        IntentMatch::none()
    }
}

fn first_match(normalized: &str, phrases: &'static [&'static str]) -> Option<&'static str> {
    phrases
        .iter()
        .copied()
        .find(|phrase| contains_phrase(normalized, phrase))
}

impl IntentClassifier for RuleBasedClassifier {
    fn classify(&self, utterance: &str) -> PaymentStatus {
        let result = self.classify_detailed(utterance);
        tracing::debug!(
            status = %result.status,
            matched = result.matched.unwrap_or("-"),
            "Rule-based intent classification"
        );
        result.status
    }

    fn name(&self) -> &str {
        "rules"
    }
}
