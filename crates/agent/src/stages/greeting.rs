use collections_agent_core::{Reply, ReplyKind, Stage};

use super::{StageHandler, TurnContext};
use crate::state::{CallState, StateUpdate};

/// Opens the call and asks the customer to confirm who they are
#[derive(Debug, Clone, Copy, Default)]
pub struct GreetingHandler;

impl StageHandler for GreetingHandler {
    fn stage(&self) -> Stage {
        Stage::Greeting
    }

    fn handle(&self, state: &CallState, ctx: &TurnContext<'_>) -> StateUpdate {
        if !state.greeted {
            let first_name = state.customer.first_name();
            let agent = &ctx.settings.agent;
            let text = format!(
                "Hello {first}, good day. This is {agent} calling from {company}. Am I speaking with {first}?",
                first = first_name,
                agent = agent.agent_name,
                company = agent.company_name,
            );
            return StateUpdate {
                greeted: Some(true),
                ..Default::default()
            }
            .reply(Reply::new(ReplyKind::Greeting, text))
            .await_input();
        }

        if state.pending_input().is_some() {
            return StateUpdate {
                greeting_acknowledged: Some(true),
                ..Default::default()
            }
            .consume();
        }

        StateUpdate::new().await_input()
    }
}
