//! Database models for pricing queries.
//!
//! These models use sqlx's FromRow derive for direct database deserialization.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Tariff applied when no pricing rule matches a booking.
pub const DEFAULT_ADULT_CENTS: i64 = 20_000;
pub const DEFAULT_CHILD_CENTS: i64 = 10_000;
pub const DEFAULT_CURRENCY: &str = "INR";

/// Pricing rule from pricing_rules
#[derive(Debug, Clone, FromRow)]
pub struct PricingRule {
    pub id: Uuid,
    pub name: Option<String>,
    /// Inclusive lower date bound
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper date bound
    pub end_date: Option<NaiveDate>,
    /// CSV of weekday numbers, Monday=0 .. Sunday=6
    pub days: Option<String>,
    /// `HH:MM`, compared against the time slot's start
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub adult_cents: i64,
    pub child_cents: i64,
    pub currency: String,
    pub priority: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PricingRule {
    /// Weekdays this rule is restricted to.
    ///
    /// Entries that are not integers in `0..=6` are ignored. An empty result
    /// means the rule applies on every day.
    pub fn weekdays(&self) -> Vec<u32> {
        self.days
            .as_deref()
            .map(parse_weekdays)
            .unwrap_or_default()
    }

    /// Unit prices and currency carried by this rule
    pub fn tariff(&self) -> Tariff {
        Tariff {
            adult_cents: self.adult_cents,
            child_cents: self.child_cents,
            currency: self.currency.clone(),
        }
    }
}

/// Parse a CSV weekday list such as `"5,6"`.
pub fn parse_weekdays(csv: &str) -> Vec<u32> {
    csv.split(',')
        .filter_map(|part| part.trim().parse::<u32>().ok())
        .filter(|day| *day <= 6)
        .collect()
}

/// Format weekday numbers back into the stored CSV form.
pub fn format_weekdays(days: &[u32]) -> Option<String> {
    if days.is_empty() {
        return None;
    }
    Some(
        days.iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join(","),
    )
}

/// Adult/child unit price pair plus currency
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tariff {
    pub adult_cents: i64,
    pub child_cents: i64,
    pub currency: String,
}

impl Tariff {
    /// The fixed fallback rate: 200.00 INR per adult, 100.00 INR per child.
    pub fn default_rate() -> Self {
        Self {
            adult_cents: DEFAULT_ADULT_CENTS,
            child_cents: DEFAULT_CHILD_CENTS,
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}
