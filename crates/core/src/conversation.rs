//! Conversation types: stages, transcript messages, intents and outcomes

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Conversation stages of a collections call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Opening and identity confirmation request
    #[default]
    Greeting,
    /// Date-of-birth check
    Verification,
    /// Mandatory debt statement and legal notice
    Disclosure,
    /// Classifying the customer's payment intent
    PaymentCheck,
    /// Proposing settlement or instalment plans
    Negotiation,
    /// Recording the outcome and ending the call
    Closing,
}

impl Stage {
    /// All stages in flow order
    pub const ALL: [Stage; 6] = [
        Stage::Greeting,
        Stage::Verification,
        Stage::Disclosure,
        Stage::PaymentCheck,
        Stage::Negotiation,
        Stage::Closing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Greeting => "greeting",
            Stage::Verification => "verification",
            Stage::Disclosure => "disclosure",
            Stage::PaymentCheck => "payment_check",
            Stage::Negotiation => "negotiation",
            Stage::Closing => "closing",
        }
    }

    /// Get stage display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Stage::Greeting => "Greeting",
            Stage::Verification => "Verification",
            Stage::Disclosure => "Disclosure",
            Stage::PaymentCheck => "Payment Check",
            Stage::Negotiation => "Negotiation",
            Stage::Closing => "Closing",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Who said a transcript line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    /// The collections agent
    Agent,
    /// The customer on the call
    Customer,
}

impl Speaker {
    pub fn as_str(&self) -> &'static str {
        match self {
            Speaker::Agent => "agent",
            Speaker::Customer => "customer",
        }
    }
}

impl std::fmt::Display for Speaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single transcript line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub speaker: Speaker,
    pub text: String,
}

impl Message {
    pub fn agent(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Agent,
            text: text.into(),
        }
    }

    pub fn customer(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Customer,
            text: text.into(),
        }
    }
}

/// Customer payment intent as classified from free text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Nothing recognisable yet
    #[default]
    None,
    /// Claims the amount was already paid
    Paid,
    /// Denies or contests the debt
    Disputed,
    /// Asks to be called another time
    Callback,
    /// Intends to pay, fully or in parts
    Willing,
    /// Cannot pay right now
    Unable,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::None => "none",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Disputed => "disputed",
            PaymentStatus::Callback => "callback",
            PaymentStatus::Willing => "willing",
            PaymentStatus::Unable => "unable",
        }
    }

    /// Whether a classification was made
    pub fn is_known(&self) -> bool {
        !matches!(self, PaymentStatus::None)
    }

    /// Statuses that end the call without negotiation
    pub fn closes_directly(&self) -> bool {
        matches!(
            self,
            PaymentStatus::Paid | PaymentStatus::Disputed | PaymentStatus::Callback
        )
    }

    /// Statuses for which a payment plan may be proposed
    pub fn is_negotiable(&self) -> bool {
        matches!(self, PaymentStatus::Willing | PaymentStatus::Unable)
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Final classification of a finished call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallOutcome {
    Paid,
    Disputed,
    Callback,
    Willing,
    Unable,
    VerificationFailed,
}

impl CallOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallOutcome::Paid => "paid",
            CallOutcome::Disputed => "disputed",
            CallOutcome::Callback => "callback",
            CallOutcome::Willing => "willing",
            CallOutcome::Unable => "unable",
            CallOutcome::VerificationFailed => "verification_failed",
        }
    }

    /// Outcome recorded by Closing for a payment status.
    ///
    /// An unclassified status is recorded as `Unable`, the same default the
    /// payment check falls back to once clarification attempts run out.
    pub fn from_payment_status(status: PaymentStatus) -> Self {
        match status {
            PaymentStatus::Paid => CallOutcome::Paid,
            PaymentStatus::Disputed => CallOutcome::Disputed,
            PaymentStatus::Callback => CallOutcome::Callback,
            PaymentStatus::Willing => CallOutcome::Willing,
            PaymentStatus::Unable | PaymentStatus::None => CallOutcome::Unable,
        }
    }
}

impl std::fmt::Display for CallOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What a canned agent reply is for.
///
/// Text renderers use this to pick their phrasing; the state machine never
/// branches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReplyKind {
    Greeting,
    VerificationPrompt,
    VerificationRetry { attempts_left: u8 },
    VerificationSuccess,
    VerificationFailed,
    Disclosure,
    PaymentQuestion,
    PaymentClarification,
    PlanOffer,
    PlanConfirmation,
    Closing { outcome: CallOutcome },
}

/// A canned agent reply produced by a stage handler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub kind: ReplyKind,
    pub text: String,
}

impl Reply {
    pub fn new(kind: ReplyKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// Read-only view of the fields observers and renderers may look at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallSnapshot {
    pub call_id: String,
    pub customer_id: String,
    pub stage: Stage,
    pub awaiting_user: bool,
    pub verification_attempts: u8,
    pub is_verified: bool,
    pub disclosure_done: bool,
    pub payment_status: PaymentStatus,
    pub negotiation_offered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ptp_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub call_outcome: Option<CallOutcome>,
    pub is_complete: bool,
    pub message_count: usize,
}
