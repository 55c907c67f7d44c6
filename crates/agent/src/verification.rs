//! Date-of-birth verification
//!
//! Compares what the customer said against the stored date of birth. The
//! reply is normalized first (spoken "March 15th, 1985" put into day-month
//! order, month names to numbers, ordinal suffixes dropped, every separator
//! turned into `-`) and then checked three ways:
//!
//! 1. exact match against the canonical forms of the stored date
//! 2. the canonical form appearing as a whole inside a longer reply
//! 3. re-reading runs of three numbers (or one compact number) as
//!    day-month-year, year-month-day and, when enabled, month-day-year
//!
//! A day and month without any year never verifies.

use chrono::{Datelike, NaiveDate};
use collections_agent_config::VerificationSettings;
use collections_agent_text_processing::month_number;
use once_cell::sync::Lazy;
use regex::Regex;

const MONTH_NAMES: &str = r"jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?";

static MONTH_NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"\b({})\b", MONTH_NAMES)).unwrap());

static SPOKEN_MONTH_FIRST_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"\b({})\s+(\d{{1,2}})(?:st|nd|rd|th)?\b[\s,]*(\d{{4}}|\d{{2}})\b",
        MONTH_NAMES
    ))
    .unwrap()
});

static ORDINAL_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(\d{1,2})(?:st|nd|rd|th)\b").unwrap());

static FILLER_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bof\b").unwrap());

static SEPARATOR_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s\-/.,']+").unwrap());

/// Order in which three numbers are read as a date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldOrder {
    DayMonthYear,
    YearMonthDay,
    MonthDayYear,
}

/// Stateless date-of-birth matcher
#[derive(Debug, Clone)]
pub struct VerificationEngine {
    accept_two_digit_year: bool,
    accept_month_first: bool,
}

impl Default for VerificationEngine {
    fn default() -> Self {
        Self::new(&VerificationSettings::default())
    }
}

impl VerificationEngine {
    pub fn new(settings: &VerificationSettings) -> Self {
        Self {
            accept_two_digit_year: settings.accept_two_digit_year,
            accept_month_first: settings.accept_month_first,
        }
    }

    /// Whether `input` states the stored date of birth
    pub fn verify(&self, input: &str, stored: NaiveDate) -> bool {
        let normalized = normalize_dob(input);
        if normalized.is_empty() {
            return false;
        }

        let canonical = canonical_forms(stored);

        if canonical.iter().any(|form| *form == normalized) {
            return true;
        }

        let padded = format!("-{}-", normalized);
        if canonical
            .iter()
            .any(|form| padded.contains(&format!("-{}-", form)))
        {
            return true;
        }

        self.matches_reordered(&normalized, stored)
    }

    fn orders(&self) -> Vec<FieldOrder> {
        let mut orders = vec![FieldOrder::DayMonthYear, FieldOrder::YearMonthDay];
        if self.accept_month_first {
            orders.push(FieldOrder::MonthDayYear);
        }
        orders
    }

    fn matches_reordered(&self, normalized: &str, stored: NaiveDate) -> bool {
        let numbers: Vec<&str> = normalized
            .split('-')
            .filter(|token| !token.is_empty() && token.chars().all(|c| c.is_ascii_digit()))
            .collect();

        for window in numbers.windows(3) {
            for order in self.orders() {
                let (day, month, year) = match order {
                    FieldOrder::DayMonthYear => (window[0], window[1], window[2]),
                    FieldOrder::YearMonthDay => (window[2], window[1], window[0]),
                    FieldOrder::MonthDayYear => (window[1], window[0], window[2]),
                };
                if self.fields_match(day, month, year, stored) {
                    return true;
                }
            }
        }

        numbers
            .iter()
            .any(|token| self.compact_matches(token, stored))
    }

    /// "15031985", "19850315", "150385"
    fn compact_matches(&self, token: &str, stored: NaiveDate) -> bool {
        match token.len() {
            8 => self.orders().into_iter().any(|order| {
                let (day, month, year) = match order {
                    FieldOrder::DayMonthYear => (&token[0..2], &token[2..4], &token[4..8]),
                    FieldOrder::YearMonthDay => (&token[6..8], &token[4..6], &token[0..4]),
                    FieldOrder::MonthDayYear => (&token[2..4], &token[0..2], &token[4..8]),
                };
                self.fields_match(day, month, year, stored)
            }),
            6 if self.accept_two_digit_year => {
                self.fields_match(&token[0..2], &token[2..4], &token[4..6], stored)
            }
            _ => false,
        }
    }

    fn fields_match(&self, day: &str, month: &str, year: &str, stored: NaiveDate) -> bool {
        let (Ok(d), Ok(m), Ok(y)) = (day.parse::<u32>(), month.parse::<u32>(), year.parse::<i32>())
        else {
            return false;
        };

        let year_matches = match year.len() {
            4 => y == stored.year(),
            2 if self.accept_two_digit_year => y == stored.year() % 100,
            _ => false,
        };

        year_matches && d == stored.day() && m == stored.month()
    }
}

/// Lowercase, month names to numbers, ordinals dropped, separators to `-`
pub fn normalize_dob(input: &str) -> String {
    let lower = input.trim().to_lowercase();

    let day_first = SPOKEN_MONTH_FIRST_PATTERN.replace_all(&lower, "$2 $1 $3");
    let months = MONTH_NAME_PATTERN.replace_all(&day_first, |caps: &regex::Captures<'_>| {
        month_number(&caps[1])
            .map(|m| m.to_string())
            .unwrap_or_else(|| caps[1].to_string())
    });
    let ordinals = ORDINAL_PATTERN.replace_all(&months, "$1");
    let fillers = FILLER_PATTERN.replace_all(&ordinals, " ");

    SEPARATOR_PATTERN
        .replace_all(&fillers, "-")
        .trim_matches('-')
        .to_string()
}

fn canonical_forms(stored: NaiveDate) -> [String; 3] {
    let (d, m, y) = (stored.day(), stored.month(), stored.year());
    [
        format!("{:02}-{:02}-{}", d, m, y),
        format!("{}-{}-{}", d, m, y),
        format!("{}-{:02}-{:02}", y, m, d),
    ]
}
