//! Response DTOs for pricing API endpoints.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use super::calculators::{minor_to_major, PriceQuote};
use super::models::PricingRule;

/// Money value for JSON responses, in major units
#[derive(Debug, Clone, Serialize)]
pub struct MoneyResponse {
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub currency: String,
}

impl MoneyResponse {
    pub fn from_minor(cents: i64, currency: &str) -> Self {
        Self {
            amount: minor_to_major(cents),
            currency: currency.to_string(),
        }
    }
}

/// Response for a visit quote
#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub total_cents: i64,
    pub currency: String,
    pub total: MoneyResponse,
    pub rule_id: Option<Uuid>,
    pub rule_name: Option<String>,
    pub default_tariff: bool,
    pub time_unverified: bool,
}

impl From<PriceQuote> for QuoteResponse {
    fn from(quote: PriceQuote) -> Self {
        Self {
            total: MoneyResponse::from_minor(quote.total_cents, &quote.currency),
            total_cents: quote.total_cents,
            default_tariff: quote.rule_id.is_none(),
            currency: quote.currency,
            rule_id: quote.rule_id,
            rule_name: quote.rule_name,
            time_unverified: quote.time_unverified,
        }
    }
}

/// Pricing rule as returned to administrators
#[derive(Debug, Serialize)]
pub struct PricingRuleResponse {
    pub id: Uuid,
    pub name: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub days: Vec<u32>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub adult_cents: i64,
    pub child_cents: i64,
    pub adult_price: MoneyResponse,
    pub child_price: MoneyResponse,
    pub currency: String,
    pub priority: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PricingRule> for PricingRuleResponse {
    fn from(rule: PricingRule) -> Self {
        Self {
            days: rule.weekdays(),
            adult_price: MoneyResponse::from_minor(rule.adult_cents, &rule.currency),
            child_price: MoneyResponse::from_minor(rule.child_cents, &rule.currency),
            id: rule.id,
            name: rule.name,
            start_date: rule.start_date,
            end_date: rule.end_date,
            start_time: rule.start_time,
            end_time: rule.end_time,
            adult_cents: rule.adult_cents,
            child_cents: rule.child_cents,
            currency: rule.currency,
            priority: rule.priority,
            created_at: rule.created_at,
            updated_at: rule.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_response_money_as_string() {
        let quote = PriceQuote {
            total_cents: 62_000,
            currency: "INR".to_string(),
            rule_id: None,
            rule_name: None,
            time_unverified: false,
        };
        let json = serde_json::to_value(QuoteResponse::from(quote)).unwrap();
        assert_eq!(json["total_cents"], 62_000);
        assert_eq!(json["total"]["amount"], "620.00");
        assert_eq!(json["total"]["currency"], "INR");
        assert_eq!(json["default_tariff"], true);
    }
}
