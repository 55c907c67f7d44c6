use collections_agent_core::{PaymentStatus, Reply, ReplyKind, Stage};

use super::{StageHandler, TurnContext};
use crate::state::{CallState, StateUpdate};

/// Classifies the customer's answer to the disclosure question
#[derive(Debug, Clone, Copy, Default)]
pub struct PaymentCheckHandler;

impl StageHandler for PaymentCheckHandler {
    fn stage(&self) -> Stage {
        Stage::PaymentCheck
    }

    fn handle(&self, state: &CallState, ctx: &TurnContext<'_>) -> StateUpdate {
        let Some(input) = state.pending_input() else {
            let text = format!(
                "Are you able to make the payment of {} today?",
                state.customer.outstanding_amount
            );
            return StateUpdate::new()
                .reply(Reply::new(ReplyKind::PaymentQuestion, text))
                .consume()
                .await_input();
        };

        let mut status = ctx.classifier.classify(input);

        if status == PaymentStatus::None {
            let max = ctx.settings.payment_check.max_clarifications;
            if state.clarification_attempts < max {
                tracing::debug!(
                    call_id = %state.call_id,
                    attempt = state.clarification_attempts + 1,
                    "Payment intent unclear, asking again"
                );
                return StateUpdate {
                    clarification_attempts: Some(state.clarification_attempts + 1),
                    ..Default::default()
                }
                .reply(Reply::new(
                    ReplyKind::PaymentClarification,
                    "I want to make sure I understand. Have you already paid, \
                     would you like to pay or set up a payment plan, \
                     or should we call you back at a better time?",
                ))
                .consume()
                .await_input();
            }

            tracing::warn!(
                call_id = %state.call_id,
                "Payment intent still unclear, defaulting to unable"
            );
            status = PaymentStatus::Unable;
        }

        let mut update = StateUpdate {
            payment_status: Some(status),
            ..Default::default()
        }
        .consume();

        match status {
            PaymentStatus::Willing => {
                let promise = ctx.extractor.extract_promise(input, ctx.today);
                update.ptp_amount = promise.amount;
                update.ptp_date = promise.date;
            }
            PaymentStatus::Disputed => {
                update.dispute_reason = Some(input.to_string());
            }
            PaymentStatus::Callback => {
                update.callback_date = ctx.extractor.extract_date(input, ctx.today);
            }
            _ => {}
        }

        tracing::info!(
            call_id = %state.call_id,
            payment_status = %status,
            "Payment intent recorded"
        );

        update
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stages::test_support::{state_at, Fixture};
    use chrono::NaiveDate;
    use collections_agent_core::Amount;

    fn run(input: &str) -> StateUpdate {
        let fixture = Fixture::new();
        let mut state = state_at(Stage::PaymentCheck);
        state.last_user_input = Some(input.to_string());
        PaymentCheckHandler.handle(&state, &fixture.ctx())
    }

    #[test]
    fn test_paid() {
        let update = run("I already paid last week");
        assert_eq!(update.payment_status, Some(PaymentStatus::Paid));
        assert!(update.consume_input);
        assert!(update.awaiting_user.is_none());
    }

    #[test]
    fn test_willing_with_promise() {
        let update = run("I will pay 20000 on 5th march");
        assert_eq!(update.payment_status, Some(PaymentStatus::Willing));
        assert_eq!(update.ptp_amount, Some(Amount::from_rupees(20000)));
        assert_eq!(update.ptp_date, NaiveDate::from_ymd_opt(2026, 3, 5));
    }

    #[test]
    fn test_willing_without_details() {
        let update = run("Yes I will pay");
        assert_eq!(update.payment_status, Some(PaymentStatus::Willing));
        assert!(update.ptp_amount.is_none());
        assert!(update.ptp_date.is_none());
    }

    #[test]
    fn test_unable_never_records_amount() {
        let update = run("I can't pay 45000 right now");
        assert_eq!(update.payment_status, Some(PaymentStatus::Unable));
        assert!(update.ptp_amount.is_none());
    }

    #[test]
    fn test_dispute_reason_recorded() {
        let update = run("This is not my loan");
        assert_eq!(update.payment_status, Some(PaymentStatus::Disputed));
        assert_eq!(update.dispute_reason.as_deref(), Some("This is not my loan"));
    }

    #[test]
    fn test_callback_date_recorded() {
        let update = run("can you call me back tomorrow");
        assert_eq!(update.payment_status, Some(PaymentStatus::Callback));
        assert_eq!(update.callback_date, NaiveDate::from_ymd_opt(2026, 1, 11));
    }

    #[test]
    fn test_unclear_reply_asks_again() {
        let update = run("hmm what");
        assert!(update.payment_status.is_none());
        assert_eq!(update.clarification_attempts, Some(1));
        assert_eq!(update.awaiting_user, Some(true));
        assert_eq!(update.replies[0].kind, ReplyKind::PaymentClarification);
    }

    #[test]
    fn test_unclear_after_clarifications_defaults_to_unable() {
        let fixture = Fixture::new();
        let mut state = state_at(Stage::PaymentCheck);
        state.clarification_attempts = 2;
        state.last_user_input = Some("hmm what".to_string());

        let update = PaymentCheckHandler.handle(&state, &fixture.ctx());
        assert_eq!(update.payment_status, Some(PaymentStatus::Unable));
        assert!(update.awaiting_user.is_none());
    }

    #[test]
    fn test_no_input_asks_question() {
        let fixture = Fixture::new();
        let state = state_at(Stage::PaymentCheck);
        let update = PaymentCheckHandler.handle(&state, &fixture.ctx());
        assert_eq!(update.awaiting_user, Some(true));
        assert_eq!(update.replies[0].kind, ReplyKind::PaymentQuestion);
    }
}
