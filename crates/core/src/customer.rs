//! Customer record and money types supplied by the lookup collaborator

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Money amount in paise.
///
/// Serialized as rupees so that records and config files can say
/// `outstanding_amount: 45000`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Amount(i64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    pub fn from_paise(paise: i64) -> Self {
        Self(paise)
    }

    pub fn from_rupees(rupees: i64) -> Self {
        Self(rupees.saturating_mul(100))
    }

    pub fn paise(&self) -> i64 {
        self.0
    }

    /// Get value in rupees
    pub fn rupees(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// `percent` of this amount, rounded down to whole rupees
    pub fn percent(&self, percent: u8) -> Amount {
        let paise = self.0.saturating_mul(i64::from(percent)) / 100;
        Amount(paise - paise % 100)
    }

    /// One of `parts` equal instalments, rounded up to whole rupees so the
    /// instalments cover the full amount
    pub fn split(&self, parts: u32) -> Amount {
        if parts == 0 {
            return *self;
        }
        let rupees = self.0 / 100;
        let parts = i64::from(parts);
        Amount::from_rupees((rupees + parts - 1) / parts)
    }

    pub fn saturating_sub(&self, other: Amount) -> Amount {
        Amount(self.0.saturating_sub(other.0).max(0))
    }
}

impl TryFrom<f64> for Amount {
    type Error = String;

    fn try_from(rupees: f64) -> Result<Self, Self::Error> {
        if !rupees.is_finite() || rupees < 0.0 {
            return Err(format!("invalid amount: {}", rupees));
        }
        Ok(Amount((rupees * 100.0).round() as i64))
    }
}

impl From<Amount> for f64 {
    fn from(amount: Amount) -> f64 {
        amount.rupees()
    }
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rupees = self.0 / 100;
        let paise = self.0 % 100;

        // Lakh grouping: the last three digits, then pairs (1,25,000)
        let digits = rupees.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 2);
        for (i, ch) in digits.chars().enumerate() {
            let from_right = digits.len() - i;
            if i > 0 && (from_right == 3 || (from_right > 3 && (from_right - 3) % 2 == 0)) {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        if paise == 0 {
            write!(f, "Rs.{}", grouped)
        } else {
            write!(f, "Rs.{}.{:02}", grouped, paise)
        }
    }
}

/// Customer and loan details the call is about
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub customer_id: String,
    pub name: String,
    pub phone: String,
    /// Stored date of birth, the verification credential
    pub date_of_birth: NaiveDate,
    pub outstanding_amount: Amount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loan_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loan_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_past_due: Option<u32>,
}

impl CustomerRecord {
    /// First word of the customer's name, used when addressing them
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_display() {
        assert_eq!(Amount::from_rupees(45000).to_string(), "Rs.45,000");
        assert_eq!(Amount::from_rupees(999).to_string(), "Rs.999");
        assert_eq!(Amount::from_paise(150050).to_string(), "Rs.1,500.50");
    }

    #[test]
    fn test_amount_display_uses_lakh_grouping() {
        assert_eq!(Amount::from_rupees(125000).to_string(), "Rs.1,25,000");
        assert_eq!(Amount::from_rupees(100000).to_string(), "Rs.1,00,000");
        assert_eq!(Amount::from_rupees(1250000).to_string(), "Rs.12,50,000");
        assert_eq!(Amount::from_rupees(10000000).to_string(), "Rs.1,00,00,000");
        assert_eq!(Amount::from_paise(12500050).to_string(), "Rs.1,25,000.50");
    }

    #[test]
    fn test_amount_arithmetic() {
        let amount = Amount::from_rupees(45000);
        assert_eq!(amount.percent(5), Amount::from_rupees(2250));
        assert_eq!(amount.split(3), Amount::from_rupees(15000));
        assert_eq!(Amount::from_rupees(125000).split(6), Amount::from_rupees(20834));
        assert_eq!(
            amount.saturating_sub(Amount::from_rupees(50000)),
            Amount::ZERO
        );
    }

    #[test]
    fn test_customer_record_from_yaml() {
        let yaml = r#"
customer_id: CUST001
name: Rajesh Kumar
phone: "+919876543210"
date_of_birth: 1985-03-15
outstanding_amount: 45000
loan_type: Personal Loan
days_past_due: 30
"#;
        let record: CustomerRecord = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(record.first_name(), "Rajesh");
        assert_eq!(record.outstanding_amount, Amount::from_rupees(45000));
        assert_eq!(
            record.date_of_birth,
            NaiveDate::from_ymd_opt(1985, 3, 15).unwrap()
        );
        assert!(record.loan_id.is_none());
    }

    #[test]
    fn test_negative_amount_rejected() {
        assert!(Amount::try_from(-1.0).is_err());
        assert!(Amount::try_from(f64::NAN).is_err());
    }
}
