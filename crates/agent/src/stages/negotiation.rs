use collections_agent_core::{PaymentStatus, Reply, ReplyKind, Stage};

use super::{spoken_date, StageHandler, TurnContext};
use crate::negotiation::{select_plan, PaymentPlan};
use crate::state::{CallState, StateUpdate};

/// Offers payment plans, then records the customer's choice
#[derive(Debug, Clone, Copy, Default)]
pub struct NegotiationHandler;

impl StageHandler for NegotiationHandler {
    fn stage(&self) -> Stage {
        Stage::Negotiation
    }

    fn handle(&self, state: &CallState, ctx: &TurnContext<'_>) -> StateUpdate {
        if !state.negotiation_offered {
            return offer_plans(state, ctx);
        }

        let Some(input) = state.pending_input() else {
            return StateUpdate::new();
        };

        let selected = select_plan(input, &state.offered_plans)
            .and_then(|index| state.offered_plans.get(index))
            .cloned();
        let promise = ctx.extractor.extract_promise(input, ctx.today);

        let mut update = StateUpdate::new().consume();

        // Amount and date only count as a promise for a willing customer.
        if state.payment_status == PaymentStatus::Willing {
            update.ptp_amount = promise
                .amount
                .or_else(|| selected.as_ref().map(|p| p.payment_amount));
            update.ptp_date = promise
                .date
                .or_else(|| selected.as_ref().map(|p| p.first_due));
        }

        let first_name = state.customer.first_name();
        let confirmation = match (&selected, update.ptp_amount, update.ptp_date) {
            (Some(plan), Some(amount), Some(date)) => Some(format!(
                "Great choice, {}. I've noted the {}, with the first payment of {} due on {}.",
                first_name,
                plan.name,
                amount,
                spoken_date(date)
            )),
            (Some(plan), _, _) => Some(format!(
                "Thank you, {}. I've noted your interest in the {}: {}.",
                first_name,
                plan.name,
                plan.description()
            )),
            (None, Some(amount), Some(date)) => Some(format!(
                "Thank you, {}. I've noted your commitment to pay {} on {}.",
                first_name,
                amount,
                spoken_date(date)
            )),
            _ => None,
        };

        if let Some(plan) = &selected {
            tracing::info!(
                call_id = %state.call_id,
                plan = %plan.name,
                "Payment plan selected"
            );
        }

        update.selected_plan = selected;
        if let Some(text) = confirmation {
            update = update.reply(Reply::new(ReplyKind::PlanConfirmation, text));
        }
        update
    }
}

fn offer_plans(state: &CallState, ctx: &TurnContext<'_>) -> StateUpdate {
    let plans = ctx
        .plans
        .build(state.customer.outstanding_amount, ctx.today);
    let first_name = state.customer.first_name();

    let opening = match state.payment_status {
        PaymentStatus::Willing => format!(
            "I appreciate your willingness to work this out, {}. Here are some options:",
            first_name
        ),
        _ => format!(
            "I understand, {}. Let me share some options that could make this easier:",
            first_name
        ),
    };

    let text = format!(
        "{}\n{}\nWhich option works best for you?",
        opening,
        numbered(&plans)
    );

    StateUpdate {
        negotiation_offered: Some(true),
        offered_plans: Some(plans),
        ..Default::default()
    }
    .reply(Reply::new(ReplyKind::PlanOffer, text))
    .await_input()
}

fn numbered(plans: &[PaymentPlan]) -> String {
    plans
        .iter()
        .enumerate()
        .map(|(i, plan)| format!("{}. {}: {}", i + 1, plan.name, plan.description()))
        .collect::<Vec<_>>()
        .join("\n")
}
