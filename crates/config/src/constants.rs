//! Centralized constants for the collections agent
//!
//! Values here are fixed by policy rather than tuned per deployment, so they
//! are deliberately not part of `Settings`.

/// Identity verification limits
pub mod verification {
    /// Date-of-birth attempts a caller gets before the call is terminated
    pub const MAX_ATTEMPTS: u8 = 3;
}

/// Defaults for the tunable sections of `Settings`
pub mod defaults {
    pub const AGENT_NAME: &str = "Priya";
    pub const COMPANY_NAME: &str = "ABC Finance";

    /// Clarification questions asked before an unclear reply is treated as `unable`
    pub const MAX_CLARIFICATIONS: u8 = 2;

    pub const SETTLEMENT_DISCOUNT_PERCENT: u8 = 5;
    pub const SETTLEMENT_WINDOW_DAYS: u32 = 7;
    pub const INSTALLMENT_MONTHS: [u32; 2] = [3, 6];

    /// Numbers at or below this many rupees are not read as promised amounts
    pub const MIN_PTP_AMOUNT_RUPEES: i64 = 100;

    pub const MAX_STEPS_PER_TURN: usize = 25;
}

/// Validation bounds applied by `Settings::validate`
pub mod limits {
    pub const MAX_SETTLEMENT_DISCOUNT_PERCENT: u8 = 50;
    pub const MIN_INSTALLMENT_MONTHS: u32 = 2;
    pub const MAX_INSTALLMENT_MONTHS: u32 = 24;
    pub const MAX_CLARIFICATIONS: u8 = 5;
    /// A full happy path touches every stage at least once, plus re-entries
    pub const MIN_STEPS_PER_TURN: usize = 8;
}
