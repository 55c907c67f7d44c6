//! Call state and typed partial updates
//!
//! `CallState` is the single record threaded through every stage. Stage
//! handlers never mutate it; they return a `StateUpdate` naming only the
//! fields they change. `CallState::apply` checks the merged result against
//! the call invariants and either commits all of it or none of it.

use chrono::NaiveDate;
use collections_agent_config::constants::verification::MAX_ATTEMPTS;
use collections_agent_core::{
    Amount, CallError, CallOutcome, CallSnapshot, CustomerRecord, Message, PaymentStatus, Reply,
    Speaker, Stage,
};
use serde::{Deserialize, Serialize};

use crate::negotiation::PaymentPlan;

/// Everything known about one call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallState {
    pub call_id: String,
    pub customer: CustomerRecord,
    pub stage: Stage,
    /// Transcript, append-only
    pub messages: Vec<Message>,
    /// Customer reply not yet consumed by a handler
    pub last_user_input: Option<String>,
    pub awaiting_user: bool,
    pub turn_count: u32,

    pub greeted: bool,
    pub greeting_acknowledged: bool,

    pub verification_attempts: u8,
    pub is_verified: bool,

    pub disclosure_done: bool,

    pub payment_status: PaymentStatus,
    pub clarification_attempts: u8,
    pub dispute_reason: Option<String>,
    pub callback_date: Option<NaiveDate>,
    pub ptp_amount: Option<Amount>,
    pub ptp_date: Option<NaiveDate>,

    pub negotiation_offered: bool,
    pub offered_plans: Vec<PaymentPlan>,
    pub selected_plan: Option<PaymentPlan>,

    pub call_outcome: Option<CallOutcome>,
    pub call_summary: Option<String>,
    pub is_complete: bool,
}

impl CallState {
    /// Fresh state at the Greeting stage
    pub fn new(customer: CustomerRecord) -> Self {
        Self::with_call_id(uuid::Uuid::new_v4().to_string(), customer)
    }

    pub fn with_call_id(call_id: impl Into<String>, customer: CustomerRecord) -> Self {
        Self {
            call_id: call_id.into(),
            customer,
            stage: Stage::Greeting,
            messages: Vec::new(),
            last_user_input: None,
            awaiting_user: false,
            turn_count: 0,
            greeted: false,
            greeting_acknowledged: false,
            verification_attempts: 0,
            is_verified: false,
            disclosure_done: false,
            payment_status: PaymentStatus::None,
            clarification_attempts: 0,
            dispute_reason: None,
            callback_date: None,
            ptp_amount: None,
            ptp_date: None,
            negotiation_offered: false,
            offered_plans: Vec::new(),
            selected_plan: None,
            call_outcome: None,
            call_summary: None,
            is_complete: false,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Most recent agent line
    pub fn last_agent_message(&self) -> Option<&Message> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.speaker == Speaker::Agent)
    }

    /// Pending input, `None` when missing or blank
    pub fn pending_input(&self) -> Option<&str> {
        self.last_user_input
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn snapshot(&self) -> CallSnapshot {
        CallSnapshot {
            call_id: self.call_id.clone(),
            customer_id: self.customer.customer_id.clone(),
            stage: self.stage,
            awaiting_user: self.awaiting_user,
            verification_attempts: self.verification_attempts,
            is_verified: self.is_verified,
            disclosure_done: self.disclosure_done,
            payment_status: self.payment_status,
            negotiation_offered: self.negotiation_offered,
            ptp_date: self.ptp_date,
            call_outcome: self.call_outcome,
            is_complete: self.is_complete,
            message_count: self.messages.len(),
        }
    }

    /// Record a customer reply and make it the pending input
    pub(crate) fn receive_input(&mut self, input: &str) {
        self.messages.push(Message::customer(input));
        self.last_user_input = Some(input.to_string());
        self.awaiting_user = false;
        self.turn_count += 1;
    }

    /// Merge an update atomically.
    ///
    /// Replies are appended as agent messages in order. On error the state is
    /// left exactly as it was.
    pub fn apply(&mut self, update: StateUpdate) -> Result<(), CallError> {
        if self.is_complete {
            return Err(CallError::InvalidStageReentry {
                call_id: self.call_id.clone(),
            });
        }

        let mut next = self.clone();
        next.merge(update);
        self.check_transition(&next)?;

        *self = next;
        Ok(())
    }

    fn merge(&mut self, update: StateUpdate) {
        let StateUpdate {
            awaiting_user,
            greeted,
            greeting_acknowledged,
            verification_attempts,
            is_verified,
            disclosure_done,
            payment_status,
            clarification_attempts,
            dispute_reason,
            callback_date,
            ptp_amount,
            ptp_date,
            negotiation_offered,
            offered_plans,
            selected_plan,
            call_outcome,
            call_summary,
            is_complete,
            replies,
            consume_input,
        } = update;

        if let Some(value) = awaiting_user {
            self.awaiting_user = value;
        }
        if let Some(value) = greeted {
            self.greeted = value;
        }
        if let Some(value) = greeting_acknowledged {
            self.greeting_acknowledged = value;
        }
        if let Some(value) = verification_attempts {
            self.verification_attempts = value;
        }
        if let Some(value) = is_verified {
            self.is_verified = value;
        }
        if let Some(value) = disclosure_done {
            self.disclosure_done = value;
        }
        if let Some(value) = payment_status {
            self.payment_status = value;
        }
        if let Some(value) = clarification_attempts {
            self.clarification_attempts = value;
        }
        if let Some(value) = negotiation_offered {
            self.negotiation_offered = value;
        }
        if let Some(value) = offered_plans {
            self.offered_plans = value;
        }
        if let Some(value) = is_complete {
            self.is_complete = value;
        }

        if dispute_reason.is_some() {
            self.dispute_reason = dispute_reason;
        }
        if callback_date.is_some() {
            self.callback_date = callback_date;
        }
        if ptp_amount.is_some() {
            self.ptp_amount = ptp_amount;
        }
        if ptp_date.is_some() {
            self.ptp_date = ptp_date;
        }
        if selected_plan.is_some() {
            self.selected_plan = selected_plan;
        }
        if call_outcome.is_some() {
            self.call_outcome = call_outcome;
        }
        if call_summary.is_some() {
            self.call_summary = call_summary;
        }

        if consume_input {
            self.last_user_input = None;
        }

        self.messages
            .extend(replies.into_iter().map(|reply| Message::agent(reply.text)));
    }

    /// Invariants between the current state and a merged candidate
    fn check_transition(&self, next: &CallState) -> Result<(), CallError> {
        let violation = |msg: String| Err(CallError::InvariantViolation(msg));

        if next.verification_attempts < self.verification_attempts {
            return violation(format!(
                "verification_attempts decreased from {} to {}",
                self.verification_attempts, next.verification_attempts
            ));
        }
        if next.verification_attempts > MAX_ATTEMPTS {
            return violation(format!(
                "verification_attempts {} exceeds {}",
                next.verification_attempts, MAX_ATTEMPTS
            ));
        }
        if self.is_verified && !next.is_verified {
            return violation("is_verified cannot be revoked".to_string());
        }
        if self.disclosure_done && next.disclosure_done != self.disclosure_done {
            return violation("disclosure_done cannot be reset".to_string());
        }
        if self.disclosure_done
            && self.stage == Stage::Disclosure
            && next.messages.len() > self.messages.len()
        {
            return violation("disclosure already given".to_string());
        }
        if next.call_outcome.is_some() != next.is_complete {
            return violation("call_outcome and is_complete must be set together".to_string());
        }
        if let Some(outcome) = next.call_outcome {
            let allowed = match self.stage {
                Stage::Closing => outcome != CallOutcome::VerificationFailed,
                Stage::Verification => outcome == CallOutcome::VerificationFailed,
                _ => false,
            };
            if !allowed {
                return violation(format!(
                    "outcome {} cannot be recorded in stage {}",
                    outcome, self.stage
                ));
            }
            if outcome == CallOutcome::VerificationFailed
                && (next.is_verified || next.verification_attempts < MAX_ATTEMPTS)
            {
                return violation("verification failed before attempts were exhausted".to_string());
            }
        }
        if next.is_complete && next.awaiting_user {
            return violation("a complete call cannot await input".to_string());
        }
        if next.ptp_amount.is_some() && next.payment_status != PaymentStatus::Willing {
            return violation(format!(
                "ptp_amount set while payment_status is {}",
                next.payment_status
            ));
        }
        if next.negotiation_offered && !self.negotiation_offered && next.offered_plans.is_empty() {
            return violation("negotiation offered without plans".to_string());
        }
        Ok(())
    }
}

/// Fields a stage handler changes; `None` leaves a field untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateUpdate {
    pub awaiting_user: Option<bool>,
    pub greeted: Option<bool>,
    pub greeting_acknowledged: Option<bool>,
    pub verification_attempts: Option<u8>,
    pub is_verified: Option<bool>,
    pub disclosure_done: Option<bool>,
    pub payment_status: Option<PaymentStatus>,
    pub clarification_attempts: Option<u8>,
    pub dispute_reason: Option<String>,
    pub callback_date: Option<NaiveDate>,
    pub ptp_amount: Option<Amount>,
    pub ptp_date: Option<NaiveDate>,
    pub negotiation_offered: Option<bool>,
    pub offered_plans: Option<Vec<PaymentPlan>>,
    pub selected_plan: Option<PaymentPlan>,
    pub call_outcome: Option<CallOutcome>,
    pub call_summary: Option<String>,
    pub is_complete: Option<bool>,
    /// Agent replies appended to the transcript after rendering
    pub replies: Vec<Reply>,
    /// Clear the pending customer input
    pub consume_input: bool,
}

impl StateUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an agent reply
    pub fn reply(mut self, reply: Reply) -> Self {
        self.replies.push(reply);
        self
    }

    /// Suspend until the customer answers
    pub fn await_input(mut self) -> Self {
        self.awaiting_user = Some(true);
        self
    }

    /// Mark the pending input as handled
    pub fn consume(mut self) -> Self {
        self.consume_input = true;
        self
    }

    /// Record the final outcome and end the call
    pub fn complete(mut self, outcome: CallOutcome, summary: String) -> Self {
        self.call_outcome = Some(outcome);
        self.call_summary = Some(summary);
        self.is_complete = Some(true);
        self.awaiting_user = Some(false);
        self
    }

    /// Nothing to merge
    pub fn is_empty(&self) -> bool {
        *self == StateUpdate::default()
    }
}
