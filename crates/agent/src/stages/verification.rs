use collections_agent_config::constants::verification::MAX_ATTEMPTS;
use collections_agent_core::{CallOutcome, Reply, ReplyKind, Stage};

use super::{call_summary, StageHandler, TurnContext};
use crate::state::{CallState, StateUpdate};

/// Date-of-birth check with a fixed number of attempts
#[derive(Debug, Clone, Copy, Default)]
pub struct VerificationHandler;

impl StageHandler for VerificationHandler {
    fn stage(&self) -> Stage {
        Stage::Verification
    }

    fn handle(&self, state: &CallState, ctx: &TurnContext<'_>) -> StateUpdate {
        if state.is_verified {
            return StateUpdate::new();
        }

        let Some(input) = state.pending_input() else {
            return StateUpdate::new()
                .reply(Reply::new(
                    ReplyKind::VerificationPrompt,
                    "For security purposes, could you please confirm your date of birth?",
                ))
                .consume()
                .await_input();
        };

        if ctx.verifier.verify(input, state.customer.date_of_birth) {
            tracing::info!(call_id = %state.call_id, "Customer identity verified");
            return StateUpdate {
                is_verified: Some(true),
                ..Default::default()
            }
            .reply(Reply::new(
                ReplyKind::VerificationSuccess,
                format!(
                    "Thank you for confirming your details, {}.",
                    state.customer.first_name()
                ),
            ))
            .consume();
        }

        let attempts = state.verification_attempts.saturating_add(1).min(MAX_ATTEMPTS);
        tracing::warn!(
            call_id = %state.call_id,
            attempts,
            "Date of birth did not match"
        );

        if attempts >= MAX_ATTEMPTS {
            let mut failed = state.clone();
            failed.verification_attempts = attempts;
            let summary = call_summary(&failed, CallOutcome::VerificationFailed);

            return StateUpdate {
                verification_attempts: Some(attempts),
                ..Default::default()
            }
            .reply(Reply::new(
                ReplyKind::VerificationFailed,
                "I'm sorry, I'm unable to verify your identity. \
                 Please contact our support team for further assistance. Goodbye.",
            ))
            .consume()
            .complete(CallOutcome::VerificationFailed, summary);
        }

        let attempts_left = MAX_ATTEMPTS - attempts;
        let text = format!(
            "That doesn't match our records. You have {} {} left. Please confirm your date of birth again.",
            attempts_left,
            if attempts_left == 1 { "attempt" } else { "attempts" }
        );

        StateUpdate {
            verification_attempts: Some(attempts),
            ..Default::default()
        }
        .reply(Reply::new(
            ReplyKind::VerificationRetry { attempts_left },
            text,
        ))
        .consume()
        .await_input()
    }
}
