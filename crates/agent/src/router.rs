//! Stage routing
//!
//! Decides the stage after a handler's update has been merged. Rules are
//! evaluated top to bottom and the first match wins:
//!
//! | Stage        | Condition                                   | Next         |
//! |--------------|---------------------------------------------|--------------|
//! | any          | call complete                               | terminal     |
//! | Greeting     | greeting acknowledged                       | Verification |
//! | Verification | verified                                    | Disclosure   |
//! | Verification | attempts exhausted                          | terminal     |
//! | Disclosure   | disclosure done                             | PaymentCheck |
//! | PaymentCheck | paid / disputed / callback                  | Closing      |
//! | PaymentCheck | willing / unable and policy says negotiate  | Negotiation  |
//! | PaymentCheck | willing / unable                            | Closing      |
//! | Negotiation  | plans offered                               | Closing      |
//! | Closing      |                                             | terminal     |
//!
//! Anything else stays in the current stage.

use collections_agent_config::constants::verification::MAX_ATTEMPTS;
use collections_agent_config::NegotiationPolicy;
use collections_agent_core::{PaymentStatus, Stage};

use crate::state::CallState;

/// Where the call goes next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Stage(Stage),
    Terminal,
}

/// Pure routing function with the negotiation policy injected
#[derive(Debug, Clone, Default)]
pub struct Router {
    policy: NegotiationPolicy,
}

impl Router {
    pub fn new(policy: NegotiationPolicy) -> Self {
        Self { policy }
    }

    /// Next stage after `stage`, given the merged state
    pub fn next(&self, stage: Stage, state: &CallState) -> Route {
        if state.is_complete {
            return Route::Terminal;
        }

        match stage {
            Stage::Greeting if state.greeting_acknowledged => Route::Stage(Stage::Verification),
            Stage::Greeting => Route::Stage(Stage::Greeting),

            Stage::Verification if state.is_verified => Route::Stage(Stage::Disclosure),
            Stage::Verification if state.verification_attempts >= MAX_ATTEMPTS => Route::Terminal,
            Stage::Verification => Route::Stage(Stage::Verification),

            Stage::Disclosure if state.disclosure_done => Route::Stage(Stage::PaymentCheck),
            Stage::Disclosure => Route::Stage(Stage::Disclosure),

            Stage::PaymentCheck if !state.payment_status.is_known() => {
                Route::Stage(Stage::PaymentCheck)
            }
            Stage::PaymentCheck if state.payment_status.closes_directly() => {
                Route::Stage(Stage::Closing)
            }
            Stage::PaymentCheck if self.should_negotiate(state) => Route::Stage(Stage::Negotiation),
            Stage::PaymentCheck => Route::Stage(Stage::Closing),

            Stage::Negotiation if state.negotiation_offered => Route::Stage(Stage::Closing),
            Stage::Negotiation => Route::Stage(Stage::Negotiation),

            Stage::Closing => Route::Terminal,
        }
    }

    /// Whether plans are worth proposing for this payment status
    pub fn should_negotiate(&self, state: &CallState) -> bool {
        if !state.payment_status.is_negotiable() {
            return false;
        }
        match state.payment_status {
            PaymentStatus::Unable => self.policy.negotiate_unable,
            _ => {
                self.policy.negotiate_willing
                    && !(self.policy.skip_full_commitment && has_full_commitment(state))
            }
        }
    }
}

/// A promise covering the whole outstanding amount on a known date
fn has_full_commitment(state: &CallState) -> bool {
    match (state.ptp_amount, state.ptp_date) {
        (Some(amount), Some(_)) => amount >= state.customer.outstanding_amount,
        _ => false,
    }
}
