//! Promise-to-pay entity extraction
//!
//! Extracts from a customer reply:
//! - Amounts (with `rs`/`₹`/`rupees` markers, comma grouping and
//!   lakh/thousand/k multipliers)
//! - Payment dates, absolute ("5th march", "march 5 2026", "05/03"),
//!   or relative to the call day ("tomorrow", "next friday", "next month")
//!
//! Date spans are removed before amounts are read, so the day in
//! "20000 on 5th march" is never mistaken for an amount. Numbers at or below
//! the configured minimum are ignored as amounts (plan numbers, month counts).
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use collections_agent_core::Amount;
//! use collections_agent_text_processing::EntityExtractor;
//!
//! let today = NaiveDate::from_ymd_opt(2026, 1, 10).unwrap();
//! let promise = EntityExtractor::new().extract_promise("I will pay 20,000 on 5th march", today);
//!
//! assert_eq!(promise.amount, Some(Amount::from_rupees(20000)));
//! assert_eq!(promise.date, NaiveDate::from_ymd_opt(2026, 3, 5));
//! ```

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};
use collections_agent_core::Amount;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

const MONTH_ALTERNATION: &str = "jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?";

// "5th march", "5 of march 2026"
static DAY_MONTH_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\b(\d{{1,2}})(?:st|nd|rd|th)?\s*(?:of\s+)?({})\b,?(?:\s*(\d{{4}}))?",
        MONTH_ALTERNATION
    ))
    .unwrap()
});

// "march 5th", "march 5, 2026"
static MONTH_DAY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\b({})\s+(\d{{1,2}})(?:st|nd|rd|th)?\b,?(?:\s*(\d{{4}}))?",
        MONTH_ALTERNATION
    ))
    .unwrap()
});

// "05/03", "5-3-2026", "05/03/26"
static NUMERIC_DATE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(\d{1,2})[/-](\d{1,2})(?:[/-](\d{4}|\d{2}))?\b").unwrap()
});

static WEEKDAY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(monday|tuesday|wednesday|thursday|friday|saturday|sunday)\b").unwrap()
});

static AMOUNT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:rs\.?|rupees?|₹|inr)?\s*(\d[\d,]*(?:\.\d+)?)(?:\s*(lakhs?|lacs?|thousand|k)\b)?")
        .unwrap()
});

/// Month number for an English month name or three-letter abbreviation
pub fn month_number(name: &str) -> Option<u32> {
    let name = name.to_lowercase();
    let month = match name.get(..3)? {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

/// Amount and date a customer committed to; either may be missing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromiseToPay {
    pub amount: Option<Amount>,
    pub date: Option<NaiveDate>,
}

impl PromiseToPay {
    pub fn is_empty(&self) -> bool {
        self.amount.is_none() && self.date.is_none()
    }

    /// Both an amount and a date were given
    pub fn is_complete(&self) -> bool {
        self.amount.is_some() && self.date.is_some()
    }
}

/// Amount and date extractor
#[derive(Debug, Clone)]
pub struct EntityExtractor {
    /// Amounts must be strictly greater than this to count
    min_amount: Amount,
}

impl Default for EntityExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityExtractor {
    /// Extractor ignoring amounts of Rs.100 and below
    pub fn new() -> Self {
        Self {
            min_amount: Amount::from_rupees(100),
        }
    }

    pub fn with_min_amount(min_amount: Amount) -> Self {
        Self { min_amount }
    }

    /// Extract amount and date from one reply
    pub fn extract_promise(&self, text: &str, today: NaiveDate) -> PromiseToPay {
        let promise = PromiseToPay {
            amount: self.extract_amount(text),
            date: self.extract_date(text, today),
        };
        if !promise.is_empty() {
            tracing::debug!(
                amount = ?promise.amount.map(|a| a.to_string()),
                date = ?promise.date,
                "Extracted promise-to-pay details"
            );
        }
        promise
    }

    /// First amount above the minimum, ignoring date spans
    pub fn extract_amount(&self, text: &str) -> Option<Amount> {
        let stripped = strip_dates(text);

        AMOUNT_PATTERN
            .captures_iter(&stripped)
            .filter_map(|caps| parse_amount(&caps))
            .find(|amount| *amount > self.min_amount)
    }

    /// First date mentioned, resolved against `today`.
    ///
    /// Explicit dates win over relative words. A date without a year that
    /// has already passed this year is taken to mean next year.
    pub fn extract_date(&self, text: &str, today: NaiveDate) -> Option<NaiveDate> {
        self.extract_explicit_date(text, today)
            .or_else(|| extract_relative_date(text, today))
    }

    fn extract_explicit_date(&self, text: &str, today: NaiveDate) -> Option<NaiveDate> {
        for caps in DAY_MONTH_PATTERN.captures_iter(text) {
            let day = caps.get(1).and_then(|m| m.as_str().parse().ok());
            let month = caps.get(2).and_then(|m| month_number(m.as_str()));
            let year = caps.get(3).and_then(|m| m.as_str().parse().ok());
            if let (Some(day), Some(month)) = (day, month) {
                if let Some(date) = resolve(day, month, year, today) {
                    return Some(date);
                }
            }
        }

        for caps in MONTH_DAY_PATTERN.captures_iter(text) {
            let month = caps.get(1).and_then(|m| month_number(m.as_str()));
            let day = caps.get(2).and_then(|m| m.as_str().parse().ok());
            let year = caps.get(3).and_then(|m| m.as_str().parse().ok());
            if let (Some(day), Some(month)) = (day, month) {
                if let Some(date) = resolve(day, month, year, today) {
                    return Some(date);
                }
            }
        }

        for caps in NUMERIC_DATE_PATTERN.captures_iter(text) {
            let day = caps.get(1).and_then(|m| m.as_str().parse().ok());
            let month = caps.get(2).and_then(|m| m.as_str().parse().ok());
            let year = caps.get(3).and_then(|m| parse_year(m.as_str()));
            if let (Some(day), Some(month)) = (day, month) {
                if let Some(date) = resolve(day, month, year, today) {
                    return Some(date);
                }
            }
        }

        None
    }
}

fn parse_amount(caps: &Captures<'_>) -> Option<Amount> {
    let digits: String = caps.get(1)?.as_str().chars().filter(|c| *c != ',').collect();
    let base: f64 = digits.parse().ok()?;

    let multiplier = match caps.get(2).map(|m| m.as_str().to_lowercase()).as_deref() {
        Some("lakh") | Some("lakhs") | Some("lac") | Some("lacs") => 100_000.0,
        Some("thousand") | Some("k") => 1_000.0,
        _ => 1.0,
    };

    let paise = (base * multiplier * 100.0).round();
    if !paise.is_finite() || paise > i64::MAX as f64 {
        return None;
    }
    Some(Amount::from_paise(paise as i64))
}

fn parse_year(text: &str) -> Option<i32> {
    let year: i32 = text.parse().ok()?;
    if text.len() == 2 {
        Some(2000 + year)
    } else {
        Some(year)
    }
}

/// Build a date, inferring the year when none was said
fn resolve(day: u32, month: u32, year: Option<i32>, today: NaiveDate) -> Option<NaiveDate> {
    match year {
        Some(year) => NaiveDate::from_ymd_opt(year, month, day),
        None => {
            let this_year = NaiveDate::from_ymd_opt(today.year(), month, day);
            match this_year {
                Some(date) if date >= today => Some(date),
                _ => NaiveDate::from_ymd_opt(today.year() + 1, month, day),
            }
        }
    }
}

fn extract_relative_date(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    let lower = text.to_lowercase();

    if lower.contains("day after tomorrow") {
        return today.checked_add_days(Days::new(2));
    }
    if lower.contains("tomorrow") {
        return today.checked_add_days(Days::new(1));
    }
    if lower.contains("today") || lower.contains("tonight") {
        return Some(today);
    }
    if let Some(caps) = WEEKDAY_PATTERN.captures(&lower) {
        let weekday = match caps.get(1)?.as_str() {
            "monday" => Weekday::Mon,
            "tuesday" => Weekday::Tue,
            "wednesday" => Weekday::Wed,
            "thursday" => Weekday::Thu,
            "friday" => Weekday::Fri,
            "saturday" => Weekday::Sat,
            _ => Weekday::Sun,
        };
        return Some(next_weekday(today, weekday));
    }
    if lower.contains("next week") {
        return today.checked_add_days(Days::new(7));
    }
    if lower.contains("next month") {
        return today.checked_add_months(Months::new(1));
    }
    None
}

/// Next occurrence of `weekday` strictly after `today`
fn next_weekday(today: NaiveDate, weekday: Weekday) -> NaiveDate {
    let current = today.weekday().num_days_from_monday();
    let target = weekday.num_days_from_monday();
    let ahead = (target + 7 - current) % 7;
    let ahead = if ahead == 0 { 7 } else { ahead };
    today + Days::new(u64::from(ahead))
}

fn strip_dates(text: &str) -> String {
    let text = DAY_MONTH_PATTERN.replace_all(text, " ");
    let text = MONTH_DAY_PATTERN.replace_all(&text, " ");
    NUMERIC_DATE_PATTERN.replace_all(&text, " ").into_owned()
}
