use collections_agent_core::{CustomerRecord, Reply, ReplyKind, Stage};

use super::{StageHandler, TurnContext};
use crate::state::{CallState, StateUpdate};

/// Statement required before any collection discussion
const LEGAL_NOTICE: &str =
    "This is an attempt to collect a debt, and any information obtained will be used for that purpose.";

/// States the debt and the legal notice, once per call
#[derive(Debug, Clone, Copy, Default)]
pub struct DisclosureHandler;

impl StageHandler for DisclosureHandler {
    fn stage(&self) -> Stage {
        Stage::Disclosure
    }

    fn handle(&self, state: &CallState, _ctx: &TurnContext<'_>) -> StateUpdate {
        if state.disclosure_done {
            return StateUpdate::new();
        }

        let text = format!(
            "{} {} Are you able to make this payment today?",
            debt_statement(&state.customer),
            LEGAL_NOTICE
        );

        StateUpdate {
            disclosure_done: Some(true),
            ..Default::default()
        }
        .reply(Reply::new(ReplyKind::Disclosure, text))
        .await_input()
    }
}

fn debt_statement(customer: &CustomerRecord) -> String {
    let account = match (&customer.loan_type, &customer.loan_id) {
        (Some(kind), Some(id)) => format!(" on your {} account {}", kind, id),
        (Some(kind), None) => format!(" on your {} account", kind),
        (None, Some(id)) => format!(" on loan account {}", id),
        (None, None) => String::new(),
    };

    let overdue = match customer.days_past_due {
        Some(days) if days > 0 => format!(", which is {} days past due", days),
        _ => String::new(),
    };

    format!(
        "I'm calling regarding your outstanding payment of {}{}{}.",
        customer.outstanding_amount, account, overdue
    )
}
