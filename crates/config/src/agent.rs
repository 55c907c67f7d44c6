//! Conversation settings
//!
//! Every section deserializes with defaults, so a config file only has to
//! name the values it changes.

use serde::{Deserialize, Serialize};

use crate::constants::defaults;

/// Who the agent says it is
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSettings {
    /// Agent name for introductions
    #[serde(default = "default_agent_name")]
    pub agent_name: String,

    /// Lender the agent calls on behalf of
    #[serde(default = "default_company_name")]
    pub company_name: String,
}

fn default_agent_name() -> String {
    defaults::AGENT_NAME.to_string()
}
fn default_company_name() -> String {
    defaults::COMPANY_NAME.to_string()
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            agent_name: default_agent_name(),
            company_name: default_company_name(),
        }
    }
}

/// Date-of-birth matching tolerances
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationSettings {
    /// Accept "15-03-85" for a 1985 birth year
    #[serde(default = "default_true")]
    pub accept_two_digit_year: bool,

    /// Accept numeric month-day-year ordering ("03/15/1985"). Off by default
    /// since it lets "03-05-1985" verify a 3 May birthday as well as 5 March.
    #[serde(default)]
    pub accept_month_first: bool,
}

fn default_true() -> bool {
    true
}

impl Default for VerificationSettings {
    fn default() -> Self {
        Self {
            accept_two_digit_year: true,
            accept_month_first: false,
        }
    }
}

/// Payment intent check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentCheckSettings {
    /// Clarifying questions asked when a reply cannot be classified
    #[serde(default = "default_max_clarifications")]
    pub max_clarifications: u8,
}

fn default_max_clarifications() -> u8 {
    defaults::MAX_CLARIFICATIONS
}

impl Default for PaymentCheckSettings {
    fn default() -> Self {
        Self {
            max_clarifications: default_max_clarifications(),
        }
    }
}

/// When to negotiate and what to offer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NegotiationPolicy {
    /// Offer plans to customers who cannot pay
    #[serde(default = "default_true")]
    pub negotiate_unable: bool,

    /// Offer plans to customers who are willing to pay
    #[serde(default = "default_true")]
    pub negotiate_willing: bool,

    /// Skip negotiation when a willing customer already promised the full
    /// outstanding amount on a specific date
    #[serde(default = "default_true")]
    pub skip_full_commitment: bool,

    /// Discount on a one-time settlement
    #[serde(default = "default_discount")]
    pub settlement_discount_percent: u8,

    /// Days the settlement offer stays open
    #[serde(default = "default_settlement_window")]
    pub settlement_window_days: u32,

    /// Instalment plans to offer, in months
    #[serde(default = "default_installment_months")]
    pub installment_months: Vec<u32>,
}

fn default_discount() -> u8 {
    defaults::SETTLEMENT_DISCOUNT_PERCENT
}
fn default_settlement_window() -> u32 {
    defaults::SETTLEMENT_WINDOW_DAYS
}
fn default_installment_months() -> Vec<u32> {
    defaults::INSTALLMENT_MONTHS.to_vec()
}

impl Default for NegotiationPolicy {
    fn default() -> Self {
        Self {
            negotiate_unable: true,
            negotiate_willing: true,
            skip_full_commitment: true,
            settlement_discount_percent: default_discount(),
            settlement_window_days: default_settlement_window(),
            installment_months: default_installment_months(),
        }
    }
}

/// Entity extraction thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntitySettings {
    /// Smallest number (exclusive) read as a promised amount
    #[serde(default = "default_min_ptp_amount")]
    pub min_ptp_amount_rupees: i64,
}

fn default_min_ptp_amount() -> i64 {
    defaults::MIN_PTP_AMOUNT_RUPEES
}

impl Default for EntitySettings {
    fn default() -> Self {
        Self {
            min_ptp_amount_rupees: default_min_ptp_amount(),
        }
    }
}

/// Driver loop safety limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Stage steps allowed while processing a single customer reply
    #[serde(default = "default_max_steps")]
    pub max_steps_per_turn: usize,
}

fn default_max_steps() -> usize {
    defaults::MAX_STEPS_PER_TURN
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            max_steps_per_turn: default_max_steps(),
        }
    }
}
