//! Payment plans offered during negotiation
//!
//! Plans are built from the negotiation policy: a one-time settlement with a
//! discount, payable within a short window, followed by one equal-instalment
//! plan per configured month count. Customers pick a plan in free text
//! ("the 6 month one", "option 2", "second", "I'll settle").

use chrono::{Days, Months, NaiveDate};
use collections_agent_config::NegotiationPolicy;
use collections_agent_core::Amount;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static MONTHS_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(\d{1,2})\s*-?\s*months?\b").unwrap());

static NUMBERED_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:plan|option|number)\s*(?:no\.?\s*)?(\d{1,2})\b").unwrap());

static BARE_NUMBER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(\d{1,2})\s*[.!]?\s*$").unwrap());

static ORDINAL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(first|1st|second|2nd|third|3rd|fourth|4th)\b").unwrap());

static SETTLEMENT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(settle|settlement|one[- ]time|lump ?sum|discount|in full|full amount)\b")
        .unwrap()
});

/// Kind of payment plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanKind {
    /// Single discounted payment
    Settlement,
    /// Equal monthly instalments (EMI)
    Installment,
}

/// A concrete plan offered to the customer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentPlan {
    pub kind: PlanKind,
    pub name: String,
    /// Amount due at each payment
    pub payment_amount: Amount,
    /// Number of payments
    pub payments: u32,
    /// Sum of all payments
    pub total: Amount,
    /// Due date of the first payment
    pub first_due: NaiveDate,
    #[serde(default)]
    pub discount_percent: u8,
    #[serde(default)]
    pub window_days: u32,
}

impl PaymentPlan {
    /// One-line description read out to the customer
    pub fn description(&self) -> String {
        match self.kind {
            PlanKind::Settlement if self.discount_percent > 0 => format!(
                "Pay {} ({}% discount) in full within {} days",
                self.payment_amount, self.discount_percent, self.window_days
            ),
            PlanKind::Settlement => format!(
                "Pay {} in full within {} days",
                self.payment_amount, self.window_days
            ),
            PlanKind::Installment => format!(
                "Pay {} per month for {} months",
                self.payment_amount, self.payments
            ),
        }
    }
}

/// Builds the plan list from the negotiation policy
#[derive(Debug, Clone)]
pub struct PlanBuilder {
    discount_percent: u8,
    window_days: u32,
    installment_months: Vec<u32>,
}

impl PlanBuilder {
    pub fn from_policy(policy: &NegotiationPolicy) -> Self {
        Self {
            discount_percent: policy.settlement_discount_percent,
            window_days: policy.settlement_window_days,
            installment_months: policy.installment_months.clone(),
        }
    }

    /// Plans for an outstanding amount, settlement first
    pub fn build(&self, outstanding: Amount, today: NaiveDate) -> Vec<PaymentPlan> {
        let mut plans = Vec::with_capacity(self.installment_months.len() + 1);

        let settlement = outstanding.saturating_sub(outstanding.percent(self.discount_percent));
        plans.push(PaymentPlan {
            kind: PlanKind::Settlement,
            name: "Immediate Settlement".to_string(),
            payment_amount: settlement,
            payments: 1,
            total: settlement,
            first_due: today
                .checked_add_days(Days::new(u64::from(self.window_days)))
                .unwrap_or(today),
            discount_percent: self.discount_percent,
            window_days: self.window_days,
        });

        let first_month = today.checked_add_months(Months::new(1)).unwrap_or(today);
        for &months in &self.installment_months {
            let monthly = outstanding.split(months);
            plans.push(PaymentPlan {
                kind: PlanKind::Installment,
                name: format!("{}-Month Installment", months),
                payment_amount: monthly,
                payments: months,
                total: Amount::from_paise(monthly.paise().saturating_mul(i64::from(months))),
                first_due: first_month,
                discount_percent: 0,
                window_days: 0,
            });
        }

        plans
    }
}

/// Index of the plan a reply picks, if any.
///
/// Checked in order: a month count ("6 months"), a plan number ("option 2"),
/// an ordinal ("second"), a bare number ("2"), then settlement words.
pub fn select_plan(reply: &str, plans: &[PaymentPlan]) -> Option<usize> {
    if plans.is_empty() {
        return None;
    }

    if let Some(caps) = MONTHS_PATTERN.captures(reply) {
        let months: u32 = caps.get(1)?.as_str().parse().ok()?;
        if let Some(index) = plans
            .iter()
            .position(|p| p.kind == PlanKind::Installment && p.payments == months)
        {
            return Some(index);
        }
    }

    let numbered = NUMBERED_PATTERN
        .captures(reply)
        .or_else(|| BARE_NUMBER_PATTERN.captures(reply));
    if let Some(caps) = numbered {
        let number: usize = caps.get(1)?.as_str().parse().ok()?;
        if (1..=plans.len()).contains(&number) {
            return Some(number - 1);
        }
    }

    if let Some(caps) = ORDINAL_PATTERN.captures(reply) {
        let index = match caps.get(1)?.as_str().to_lowercase().as_str() {
            "first" | "1st" => 0,
            "second" | "2nd" => 1,
            "third" | "3rd" => 2,
            _ => 3,
        };
        if index < plans.len() {
            return Some(index);
        }
    }

    if SETTLEMENT_PATTERN.is_match(reply) {
        return plans.iter().position(|p| p.kind == PlanKind::Settlement);
    }

    None
}
