use collections_agent_core::{CallOutcome, Reply, ReplyKind, Stage};

use super::{spoken_date, StageHandler, TurnContext};
use crate::state::{CallState, StateUpdate};

/// Records the outcome and ends the call
#[derive(Debug, Clone, Copy, Default)]
pub struct ClosingHandler;

impl StageHandler for ClosingHandler {
    fn stage(&self) -> Stage {
        Stage::Closing
    }

    fn handle(&self, state: &CallState, ctx: &TurnContext<'_>) -> StateUpdate {
        let outcome = CallOutcome::from_payment_status(state.payment_status);
        let text = format!(
            "{} Thank you for your time. This call was from {}. Goodbye.",
            closing_line(state, outcome),
            ctx.settings.agent.company_name
        );

        StateUpdate::new()
            .reply(Reply::new(ReplyKind::Closing { outcome }, text))
            .consume()
            .complete(outcome, call_summary(state, outcome))
    }
}

fn closing_line(state: &CallState, outcome: CallOutcome) -> String {
    let first_name = state.customer.first_name();
    match outcome {
        CallOutcome::Paid => format!(
            "Thank you, {}. We'll verify your payment against our records within 2-3 working days \
             and contact you only if we cannot locate it.",
            first_name
        ),
        CallOutcome::Disputed => format!(
            "I've noted your dispute, {}. Our team will review the account and get back to you \
             within 7 working days.",
            first_name
        ),
        CallOutcome::Callback => match state.callback_date {
            Some(date) => format!(
                "No problem, {}. We'll call you back on {}.",
                first_name,
                spoken_date(date)
            ),
            None => format!(
                "No problem, {}. We'll call you back at a more convenient time.",
                first_name
            ),
        },
        CallOutcome::Willing => match (state.ptp_amount, state.ptp_date) {
            (Some(amount), Some(date)) => format!(
                "Thank you, {}. I've recorded your commitment to pay {} on {}. \
                 You'll receive a confirmation shortly.",
                first_name,
                amount,
                spoken_date(date)
            ),
            _ => format!(
                "Thank you, {}. We'll send you the payment details so you can complete the payment.",
                first_name
            ),
        },
        CallOutcome::Unable => match &state.selected_plan {
            Some(plan) => format!(
                "I understand, {}. I've noted your interest in the {} and a representative \
                 will follow up to set it up.",
                first_name, plan.name
            ),
            None => format!(
                "I understand your situation, {}. A representative will follow up with you \
                 to discuss what is possible.",
                first_name
            ),
        },
        CallOutcome::VerificationFailed => {
            "I'm unable to continue without verifying your identity.".to_string()
        }
    }
}

/// One-line record of the call for downstream systems
pub fn call_summary(state: &CallState, outcome: CallOutcome) -> String {
    let mut parts = vec![
        format!("call {}", state.call_id),
        format!(
            "customer {} ({})",
            state.customer.customer_id, state.customer.name
        ),
        format!("outstanding {}", state.customer.outstanding_amount),
        format!(
            "verified {}",
            if state.is_verified { "yes" } else { "no" }
        ),
        format!("verification attempts {}", state.verification_attempts),
    ];

    if state.disclosure_done {
        parts.push("disclosure given".to_string());
    }
    if state.payment_status.is_known() {
        parts.push(format!("payment status {}", state.payment_status));
    }
    if let Some(reason) = &state.dispute_reason {
        parts.push(format!("dispute \"{}\"", reason));
    }
    if let Some(date) = state.callback_date {
        parts.push(format!("callback {}", date));
    }
    if !state.offered_plans.is_empty() {
        parts.push(format!("{} plans offered", state.offered_plans.len()));
    }
    if let Some(plan) = &state.selected_plan {
        parts.push(format!("plan {}", plan.name));
    }
    match (state.ptp_amount, state.ptp_date) {
        (Some(amount), Some(date)) => parts.push(format!("ptp {} on {}", amount, date)),
        (Some(amount), None) => parts.push(format!("ptp {}", amount)),
        (None, Some(date)) => parts.push(format!("ptp on {}", date)),
        (None, None) => {}
    }
    parts.push(format!("outcome {}", outcome));
    parts.push(format!("turns {}", state.turn_count));

    parts.join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stages::test_support::{state_at, Fixture};
    use chrono::NaiveDate;
    use collections_agent_core::{Amount, PaymentStatus};

    fn close(state: &CallState) -> StateUpdate {
        let fixture = Fixture::new();
        ClosingHandler.handle(state, &fixture.ctx())
    }

    #[test]
    fn test_outcome_mirrors_payment_status() {
        for (status, outcome) in [
            (PaymentStatus::Paid, CallOutcome::Paid),
            (PaymentStatus::Disputed, CallOutcome::Disputed),
            (PaymentStatus::Callback, CallOutcome::Callback),
            (PaymentStatus::Willing, CallOutcome::Willing),
            (PaymentStatus::Unable, CallOutcome::Unable),
        ] {
            let mut state = state_at(Stage::Closing);
            state.payment_status = status;
            let update = close(&state);
            assert_eq!(update.call_outcome, Some(outcome));
            assert_eq!(update.is_complete, Some(true));
            assert_eq!(update.replies[0].kind, ReplyKind::Closing { outcome });
        }
    }

    #[test]
    fn test_unclassified_closes_as_unable() {
        let state = state_at(Stage::Closing);
        assert_eq!(close(&state).call_outcome, Some(CallOutcome::Unable));
    }

    #[test]
    fn test_promise_in_closing_message() {
        let mut state = state_at(Stage::Closing);
        state.payment_status = PaymentStatus::Willing;
        state.ptp_amount = Some(Amount::from_rupees(20000));
        state.ptp_date = NaiveDate::from_ymd_opt(2026, 3, 5);

        let update = close(&state);
        assert!(update.replies[0]
            .text
            .contains("commitment to pay Rs.20,000 on 5 March 2026"));
        let summary = update.call_summary.unwrap();
        assert!(summary.contains("ptp Rs.20,000 on 2026-03-05"));
        assert!(summary.contains("outcome willing"));
    }

    #[test]
    fn test_callback_date_in_closing_message() {
        let mut state = state_at(Stage::Closing);
        state.payment_status = PaymentStatus::Callback;
        state.callback_date = NaiveDate::from_ymd_opt(2026, 1, 11);

        let update = close(&state);
        assert!(update.replies[0].text.contains("call you back on 11 January 2026"));
    }

    #[test]
    fn test_summary_fields() {
        let mut state = state_at(Stage::Closing);
        state.is_verified = true;
        state.disclosure_done = true;
        state.payment_status = PaymentStatus::Disputed;
        state.dispute_reason = Some("not my loan".to_string());

        let summary = call_summary(&state, CallOutcome::Disputed);
        assert!(summary.starts_with("call call-1 | customer CUST001 (Rajesh Kumar)"));
        assert!(summary.contains("verified yes"));
        assert!(summary.contains("dispute \"not my loan\""));
        assert!(summary.ends_with("outcome disputed | turns 0"));
    }
}
