//! End-to-end call scenarios driven through the public engine API
//!
//! Every call is pinned to Saturday 10 January 2026 so relative dates are
//! stable.

use std::sync::Arc;

use chrono::NaiveDate;
use collections_agent::{
    CallError, CallOutcome, CallState, ConversationEngine, PaymentStatus, RecordingObserver,
    Route, Router, Stage, StaticCustomerDirectory, StepOutcome,
};
use collections_agent_config::constants::verification::MAX_ATTEMPTS;
use collections_agent_config::{NegotiationPolicy, Settings};
use collections_agent_core::{
    Amount, CallSnapshot, CustomerDirectory, CustomerRecord, Reply, ResponseRenderer, Speaker,
};

const DIRECTORY_YAML: &str = r#"
customers:
  - customer_id: CUST001
    name: Rajesh Kumar
    phone: "+91 98765 43210"
    date_of_birth: 1985-03-15
    outstanding_amount: 45000
    loan_id: PL-2023-0042
    loan_type: Personal Loan
    days_past_due: 30
  - customer_id: CUST002
    name: Anita Sharma
    phone: "+91 91234 56789"
    date_of_birth: 1990-11-02
    outstanding_amount: 12500.50
"#;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 10).unwrap()
}

fn customer() -> CustomerRecord {
    StaticCustomerDirectory::from_yaml_str(DIRECTORY_YAML)
        .unwrap()
        .find_by_phone("9876543210")
        .unwrap()
}

fn engine() -> ConversationEngine {
    let state = CallState::with_call_id("call-test", customer());
    ConversationEngine::with_state(state, &Settings::default()).with_today(today())
}

/// Greeted, acknowledged and verified; the disclosure question is pending
fn verified(mut engine: ConversationEngine) -> ConversationEngine {
    engine.start().unwrap();
    engine.submit("Yes, speaking").unwrap();
    engine.submit("15-03-1985").unwrap();
    assert_eq!(engine.state().stage, Stage::Disclosure);
    assert!(engine.state().is_verified);
    engine
}

fn agent_lines(engine: &ConversationEngine) -> Vec<String> {
    engine
        .state()
        .messages()
        .iter()
        .filter(|m| m.speaker == Speaker::Agent)
        .map(|m| m.text.clone())
        .collect()
}

#[test]
fn test_paid_call() {
    let mut engine = verified(engine());
    let outcome = engine.submit("I already paid last week").unwrap();

    assert_eq!(
        outcome,
        StepOutcome::Completed {
            outcome: CallOutcome::Paid
        }
    );
    let state = engine.state();
    assert_eq!(state.stage, Stage::Closing);
    assert_eq!(state.payment_status, PaymentStatus::Paid);
    assert_eq!(state.call_outcome, Some(CallOutcome::Paid));
    assert!(state.is_complete);
    assert!(!state.awaiting_user);
    assert!(!state.negotiation_offered);

    let last = state.last_agent_message().unwrap();
    assert!(last.text.contains("Goodbye"));
    assert!(state
        .call_summary
        .as_deref()
        .unwrap()
        .contains("outcome paid"));
}

#[test]
fn test_callback_call() {
    let mut engine = verified(engine());
    engine.submit("can you call me back tomorrow").unwrap();

    let state = engine.state();
    assert_eq!(state.payment_status, PaymentStatus::Callback);
    assert_eq!(state.callback_date, NaiveDate::from_ymd_opt(2026, 1, 11));
    assert_eq!(state.call_outcome, Some(CallOutcome::Callback));
    assert!(state
        .last_agent_message()
        .unwrap()
        .text
        .contains("call you back on 11 January 2026"));
}

#[test]
fn test_callback_wins_over_payment_language() {
    let mut engine = verified(engine());
    engine
        .submit("I'm driving right now, call me back and I will pay next week")
        .unwrap();

    assert_eq!(engine.state().payment_status, PaymentStatus::Callback);
    assert_eq!(engine.outcome(), Some(CallOutcome::Callback));
    assert!(engine.state().ptp_amount.is_none());
}

#[test]
fn test_unable_goes_through_negotiation() {
    let mut engine = verified(engine());
    let outcome = engine
        .submit("I can't pay the full amount but can do installments")
        .unwrap();

    assert_eq!(
        outcome,
        StepOutcome::Suspended {
            stage: Stage::Negotiation
        }
    );
    {
        let state = engine.state();
        assert_eq!(state.payment_status, PaymentStatus::Unable);
        assert!(state.negotiation_offered);
        assert_eq!(state.offered_plans.len(), 3);
        assert!(!state.is_complete);
        assert!(state
            .last_agent_message()
            .unwrap()
            .text
            .ends_with("Which option works best for you?"));
    }

    engine.submit("the 6 month plan please").unwrap();
    let state = engine.state();
    assert_eq!(state.stage, Stage::Closing);
    assert_eq!(state.payment_status, PaymentStatus::Unable);
    assert_eq!(state.call_outcome, Some(CallOutcome::Unable));
    assert_eq!(state.selected_plan.as_ref().map(|p| p.payments), Some(6));
    assert!(state.ptp_amount.is_none());
    assert!(state.is_complete);
}

#[test]
fn test_full_promise_skips_negotiation() {
    let mut engine = verified(engine());
    engine.submit("I will pay 45000 on 5th march").unwrap();

    let state = engine.state();
    assert_eq!(state.payment_status, PaymentStatus::Willing);
    assert_eq!(state.ptp_amount, Some(Amount::from_rupees(45000)));
    assert_eq!(state.ptp_date, NaiveDate::from_ymd_opt(2026, 3, 5));
    assert!(!state.negotiation_offered);
    assert_eq!(state.call_outcome, Some(CallOutcome::Willing));
    assert!(state
        .last_agent_message()
        .unwrap()
        .text
        .contains("commitment to pay Rs.45,000 on 5 March 2026"));
}

#[test]
fn test_partial_promise_then_plan() {
    let mut engine = verified(engine());
    engine.submit("I will pay 20000 on 5th march").unwrap();
    {
        let state = engine.state();
        assert_eq!(state.stage, Stage::Negotiation);
        assert_eq!(state.ptp_amount, Some(Amount::from_rupees(20000)));
        assert_eq!(state.ptp_date, NaiveDate::from_ymd_opt(2026, 3, 5));
    }

    engine.submit("option 2").unwrap();
    let state = engine.state();
    assert_eq!(state.call_outcome, Some(CallOutcome::Willing));
    assert_eq!(state.selected_plan.as_ref().map(|p| p.payments), Some(3));
    assert_eq!(state.ptp_amount, Some(Amount::from_rupees(15000)));
    assert_eq!(state.ptp_date, NaiveDate::from_ymd_opt(2026, 2, 10));
}

#[test]
fn test_three_wrong_dobs_end_the_call() {
    let mut engine = engine();
    engine.start().unwrap();
    engine.submit("yes").unwrap();

    engine.submit("01-01-1990").unwrap();
    assert_eq!(engine.state().verification_attempts, 1);
    engine.submit("2nd February 1991").unwrap();
    assert_eq!(engine.state().verification_attempts, 2);
    assert!(!engine.is_complete());

    let outcome = engine.submit("1980-12-31").unwrap();
    assert_eq!(
        outcome,
        StepOutcome::Completed {
            outcome: CallOutcome::VerificationFailed
        }
    );

    let state = engine.state();
    assert_eq!(state.stage, Stage::Verification);
    assert_eq!(state.verification_attempts, 3);
    assert!(!state.is_verified);
    assert!(!state.disclosure_done);
    assert!(state.is_complete);
    assert!(agent_lines(&engine)
        .iter()
        .all(|line| !line.contains("attempt to collect a debt")));
}

#[test]
fn test_wrong_dob_then_match() {
    let mut engine = engine();
    engine.start().unwrap();
    engine.submit("hello").unwrap();
    engine.submit("16/03/1985").unwrap();
    engine.submit("March 15, 1985").unwrap();

    let state = engine.state();
    assert!(state.is_verified);
    assert_eq!(state.verification_attempts, 1);
    assert_eq!(state.stage, Stage::Disclosure);
}

#[test]
fn test_disclosure_given_once() {
    let mut engine = verified(engine());
    engine.submit("hmm what").unwrap();
    engine.submit("I can't afford it").unwrap();
    engine.submit("1").unwrap();

    assert!(engine.is_complete());
    let disclosures = agent_lines(&engine)
        .iter()
        .filter(|line| line.contains("attempt to collect a debt"))
        .count();
    assert_eq!(disclosures, 1);
}

#[test]
fn test_outcome_set_only_when_complete() {
    let recorder = Arc::new(RecordingObserver::new());
    let mut engine = engine().with_observer(recorder.clone());

    engine.start().unwrap();
    for input in [
        "yes",
        "15 March 1985",
        "I can't pay right now",
        "the settlement",
    ] {
        engine.submit(input).unwrap();
    }

    let snapshots = recorder.snapshots();
    assert!(!snapshots.is_empty());
    for snapshot in &snapshots {
        assert_eq!(snapshot.call_outcome.is_some(), snapshot.is_complete);
        assert!(snapshot.verification_attempts <= 3);
    }
    assert_eq!(
        recorder.completed().and_then(|s| s.call_outcome),
        Some(CallOutcome::Unable)
    );
}

#[test]
fn test_unclear_replies_fall_back_to_unable() {
    let mut engine = verified(engine());
    engine.submit("hmm what").unwrap();
    engine.submit("sorry?").unwrap();
    assert_eq!(engine.state().clarification_attempts, 2);
    assert_eq!(engine.state().stage, Stage::PaymentCheck);

    engine.submit("hmm what").unwrap();
    let state = engine.state();
    assert_eq!(state.payment_status, PaymentStatus::Unable);
    assert_eq!(state.stage, Stage::Negotiation);
    assert!(state.negotiation_offered);
}

#[test]
fn test_submit_after_completion_is_rejected() {
    let mut engine = verified(engine());
    engine.submit("this is not my loan").unwrap();
    assert_eq!(engine.outcome(), Some(CallOutcome::Disputed));
    let before = engine.state().clone();

    assert_eq!(
        engine.submit("wait"),
        Err(CallError::InvalidStageReentry {
            call_id: "call-test".to_string()
        })
    );
    assert_eq!(engine.state(), &before);
}

#[test]
fn test_blank_input_is_rejected_without_mutation() {
    let mut engine = verified(engine());
    let before = engine.state().clone();

    assert_eq!(engine.submit(""), Err(CallError::InputMissing));
    assert_eq!(engine.submit(" \t "), Err(CallError::InputMissing));
    assert_eq!(engine.state(), &before);
}

struct ShoutingRenderer;

impl ResponseRenderer for ShoutingRenderer {
    fn rephrase(&self, reply: &Reply, _snapshot: &CallSnapshot) -> Option<String> {
        Some(reply.text.to_uppercase())
    }
}

#[test]
fn test_renderer_only_changes_text() {
    let inputs = ["yes", "15-03-1985", "I can't pay", "option 2"];

    let mut canned = engine();
    let mut rendered = engine().with_renderer(Arc::new(ShoutingRenderer));
    canned.start().unwrap();
    rendered.start().unwrap();
    for input in inputs {
        canned.submit(input).unwrap();
        rendered.submit(input).unwrap();
    }

    let canned_lines = agent_lines(&canned);
    let rendered_lines = agent_lines(&rendered);
    assert_eq!(canned_lines.len(), rendered_lines.len());
    for (a, b) in canned_lines.iter().zip(&rendered_lines) {
        assert_eq!(&a.to_uppercase(), b);
    }

    let mut a = canned.state().clone();
    let mut b = rendered.state().clone();
    a.messages.clear();
    b.messages.clear();
    assert_eq!(a, b);
    assert_eq!(canned.transitions(), rendered.transitions());
}

#[test]
fn test_engine_from_directory() {
    let directory = StaticCustomerDirectory::from_yaml_str(DIRECTORY_YAML).unwrap();
    assert_eq!(directory.len(), 2);

    let mut engine =
        ConversationEngine::from_directory(&directory, "+91-91234-56789", &Settings::default())
            .unwrap()
            .with_today(today());
    engine.start().unwrap();
    assert!(engine.state().messages()[0]
        .text
        .starts_with("Hello Anita, good day."));
    assert_eq!(
        engine.state().customer.outstanding_amount,
        Amount::from_paise(1_250_050)
    );

    let missing =
        ConversationEngine::from_directory(&directory, "0000000000", &Settings::default());
    assert!(matches!(missing, Err(CallError::CustomerNotFound(_))));
}

#[test]
fn test_recorded_stage_path() {
    let recorder = Arc::new(RecordingObserver::new());
    let mut engine = verified(engine().with_observer(recorder.clone()));
    engine.submit("payment done yesterday").unwrap();

    assert_eq!(
        recorder.transitions(),
        vec![
            (Stage::Greeting, Stage::Verification),
            (Stage::Verification, Stage::Disclosure),
            (Stage::Disclosure, Stage::PaymentCheck),
            (Stage::PaymentCheck, Stage::Closing),
        ]
    );
    assert_eq!(engine.transitions().len(), 4);
    assert_eq!(
        recorder.completed().map(|s| s.stage),
        Some(Stage::Closing)
    );
}

#[test]
fn test_negotiation_policy_can_be_disabled() {
    let mut settings = Settings::default();
    settings.negotiation.negotiate_unable = false;

    let state = CallState::with_call_id("call-policy", customer());
    let mut engine = verified(ConversationEngine::with_state(state, &settings).with_today(today()));
    engine.submit("I lost my job, I have no money").unwrap();

    let state = engine.state();
    assert!(!state.negotiation_offered);
    assert_eq!(state.call_outcome, Some(CallOutcome::Unable));
}

#[test]
fn test_call_record_serializes_amounts_in_rupees() {
    let mut engine = verified(engine());
    engine.submit("I already paid").unwrap();

    let json = serde_json::to_value(engine.state()).unwrap();
    assert_eq!(json["stage"], "closing");
    assert_eq!(json["payment_status"], "paid");
    assert_eq!(json["call_outcome"], "paid");
    assert_eq!(json["customer"]["outstanding_amount"], 45000.0);
    assert_eq!(json["customer"]["date_of_birth"], "1985-03-15");

    let restored: CallState = serde_json::from_value(json).unwrap();
    assert_eq!(&restored, engine.state());
}

fn stage_index(stage: Stage) -> usize {
    Stage::ALL.iter().position(|s| *s == stage).unwrap()
}

/// Follows the router from `start` without any handler running, returning
/// the stages visited before the terminal route.
fn walk(router: &Router, start: Stage, state: &CallState) -> Vec<Stage> {
    let mut visited = vec![start];
    let mut stage = start;
    for _ in 0..Stage::ALL.len() {
        match router.next(stage, state) {
            Route::Terminal => return visited,
            Route::Stage(next) => {
                assert!(
                    stage_index(next) > stage_index(stage),
                    "{:?} routed back or in place to {:?}",
                    stage,
                    next
                );
                visited.push(next);
                stage = next;
            }
        }
    }
    panic!("no terminal route from {:?}: {:?}", start, visited);
}

#[test]
fn test_every_stage_reaches_a_terminal_route() {
    let routers = [
        Router::default(),
        Router::new(NegotiationPolicy {
            negotiate_unable: false,
            negotiate_willing: false,
            ..Default::default()
        }),
    ];

    let mut states = Vec::new();
    for status in [
        PaymentStatus::Paid,
        PaymentStatus::Disputed,
        PaymentStatus::Callback,
        PaymentStatus::Willing,
        PaymentStatus::Unable,
    ] {
        let mut state = CallState::with_call_id("call-route", customer());
        state.greeting_acknowledged = true;
        state.is_verified = true;
        state.disclosure_done = true;
        state.payment_status = status;
        state.negotiation_offered = true;
        states.push(state);
    }

    for router in &routers {
        for state in &states {
            for stage in Stage::ALL {
                let path = walk(router, stage, state);
                assert!(path.len() <= Stage::ALL.len());
            }
        }
    }

    let mut exhausted = CallState::with_call_id("call-route", customer());
    exhausted.greeting_acknowledged = true;
    exhausted.verification_attempts = MAX_ATTEMPTS;
    for router in &routers {
        assert_eq!(
            walk(router, Stage::Greeting, &exhausted),
            vec![Stage::Greeting, Stage::Verification]
        );
    }
}

#[test]
fn test_unanswered_stages_wait_instead_of_looping() {
    let router = Router::default();
    let state = CallState::with_call_id("call-route", customer());

    for stage in Stage::ALL {
        match router.next(stage, &state) {
            Route::Terminal => assert_eq!(stage, Stage::Closing),
            Route::Stage(next) => assert_eq!(next, stage),
        }
    }
}
