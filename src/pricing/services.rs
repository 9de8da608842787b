//! Pricing service functions with database access.
//!
//! These functions read the rule table (through the cache) and hand an
//! immutable snapshot to the pure resolver.

use chrono::NaiveTime;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::cache::AppCache;

use super::calculators::{self, PriceQuote};
use super::models::{format_weekdays, PricingRule};
use super::queries::{self, RuleValues};
use super::requests::{PricingRuleRequest, VisitRequest};

/// Pricing error types
#[derive(Debug, Clone)]
pub enum PricingError {
    Validation { field: String, message: String },
    RuleNotFound { rule_id: Uuid },
    Storage { message: String },
}

impl std::fmt::Display for PricingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PricingError::Validation { message, .. } => write!(f, "{}", message),
            PricingError::RuleNotFound { rule_id } => {
                write!(f, "Pricing rule {} not found", rule_id)
            }
            PricingError::Storage { message } => write!(f, "Storage error: {}", message),
        }
    }
}

impl std::error::Error for PricingError {}

impl From<crate::error::AppError> for PricingError {
    fn from(err: crate::error::AppError) -> Self {
        PricingError::Storage {
            message: err.to_string(),
        }
    }
}

/// Load the ordered rule snapshot, from cache when available.
pub async fn load_rule_snapshot(
    pool: &PgPool,
    cache: &AppCache,
) -> Result<Arc<Vec<PricingRule>>, PricingError> {
    if let Some(cached) = cache.pricing_rules.get(AppCache::RULES_KEY).await {
        tracing::debug!("Cache HIT for pricing rules ({} rules)", cached.len());
        return Ok(cached);
    }

    tracing::debug!("Cache MISS for pricing rules");
    // Taken before the read so a write landing mid-query keeps this snapshot out of the cache.
    let generation = cache.generation();
    let mut rules = queries::list_rules(pool).await?;
    // The query already orders rules; the stable sort keeps that order among ties.
    calculators::sort_by_priority(&mut rules);
    let snapshot = Arc::new(rules);
    if !cache.insert_pricing_rules(generation, snapshot.clone()).await {
        tracing::debug!("Pricing rules changed during load, snapshot not cached");
    }

    Ok(snapshot)
}

/// Quote a visit against the current rule snapshot.
pub async fn quote(
    pool: &PgPool,
    cache: &AppCache,
    visit: &VisitRequest,
) -> Result<PriceQuote, PricingError> {
    let rules = load_rule_snapshot(pool, cache).await?;
    let quote = calculators::resolve(
        &rules,
        visit.date,
        &visit.time_slot,
        visit.num_adults,
        visit.num_children,
    );

    match quote.rule_id {
        Some(rule_id) => tracing::debug!(
            %rule_id,
            total_cents = quote.total_cents,
            time_unverified = quote.time_unverified,
            "Priced visit on {} with rule",
            visit.date
        ),
        None => tracing::debug!(
            total_cents = quote.total_cents,
            "No pricing rule matched {}, using default tariff",
            visit.date
        ),
    }

    Ok(quote)
}

/// Validate an admin rule request and convert it to column values.
pub fn validate_rule(req: PricingRuleRequest) -> Result<RuleValues, PricingError> {
    let currency = req.currency.trim().to_ascii_uppercase();
    if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(invalid("currency", "currency must be a 3-letter code"));
    }
    if req.adult_cents < 0 {
        return Err(invalid("adult_cents", "adult_cents must not be negative"));
    }
    if req.child_cents < 0 {
        return Err(invalid("child_cents", "child_cents must not be negative"));
    }
    if let (Some(start), Some(end)) = (req.start_date, req.end_date) {
        if start > end {
            return Err(invalid("end_date", "end_date must not be before start_date"));
        }
    }

    let start_time = normalize_time("start_time", req.start_time)?;
    let end_time = normalize_time("end_time", req.end_time)?;

    let mut days = req
        .days
        .unwrap_or_default()
        .into_iter()
        .map(|d| u32::try_from(d).ok().filter(|d| *d <= 6))
        .collect::<Option<Vec<u32>>>()
        .ok_or_else(|| invalid("days", "days must be between 0 (Monday) and 6 (Sunday)"))?;
    days.sort_unstable();
    days.dedup();

    let name = req
        .name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());

    Ok(RuleValues {
        name,
        start_date: req.start_date,
        end_date: req.end_date,
        days: format_weekdays(&days),
        start_time,
        end_time,
        adult_cents: req.adult_cents,
        child_cents: req.child_cents,
        currency,
        priority: req.priority,
    })
}

fn normalize_time(field: &str, value: Option<String>) -> Result<Option<String>, PricingError> {
    let Some(raw) = value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    NaiveTime::parse_from_str(&raw, "%H:%M")
        .map(|t| Some(t.format("%H:%M").to_string()))
        .map_err(|_| invalid(field, &format!("{} must be in HH:MM format", field)))
}

fn invalid(field: &str, message: &str) -> PricingError {
    PricingError::Validation {
        field: field.to_string(),
        message: message.to_string(),
    }
}

/// Create a rule and drop the cached snapshot
pub async fn create_rule(
    pool: &PgPool,
    cache: &AppCache,
    req: PricingRuleRequest,
) -> Result<PricingRule, PricingError> {
    let values = validate_rule(req)?;
    let rule = queries::insert_rule(pool, &values).await?;
    cache.invalidate_pricing_rules().await;
    tracing::info!(rule_id = %rule.id, priority = rule.priority, "Pricing rule created");
    Ok(rule)
}

/// Replace a rule and drop the cached snapshot
pub async fn update_rule(
    pool: &PgPool,
    cache: &AppCache,
    rule_id: Uuid,
    req: PricingRuleRequest,
) -> Result<PricingRule, PricingError> {
    let values = validate_rule(req)?;
    let rule = queries::update_rule(pool, rule_id, &values)
        .await?
        .ok_or(PricingError::RuleNotFound { rule_id })?;
    cache.invalidate_pricing_rules().await;
    tracing::info!(rule_id = %rule.id, priority = rule.priority, "Pricing rule updated");
    Ok(rule)
}

/// Delete a rule and drop the cached snapshot
pub async fn delete_rule(
    pool: &PgPool,
    cache: &AppCache,
    rule_id: Uuid,
) -> Result<(), PricingError> {
    if !queries::delete_rule(pool, rule_id).await? {
        return Err(PricingError::RuleNotFound { rule_id });
    }
    cache.invalidate_pricing_rules().await;
    tracing::info!(%rule_id, "Pricing rule deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> PricingRuleRequest {
        PricingRuleRequest {
            name: Some("  Weekend  ".to_string()),
            start_date: None,
            end_date: None,
            days: Some(vec![6, 5, 6]),
            start_time: Some("9:00".to_string()),
            end_time: None,
            adult_cents: 25_000,
            child_cents: 12_000,
            currency: "inr".to_string(),
            priority: 5,
        }
    }

    #[test]
    fn test_pricing_error_display() {
        let err = PricingError::Validation {
            field: "currency".to_string(),
            message: "currency must be a 3-letter code".to_string(),
        };
        assert!(err.to_string().contains("currency"));

        let id = Uuid::new_v4();
        let err = PricingError::RuleNotFound { rule_id: id };
        assert!(err.to_string().contains(&id.to_string()));
    }

    #[test]
    fn test_validate_rule_normalizes() {
        let values = validate_rule(request()).unwrap();
        assert_eq!(values.name.as_deref(), Some("Weekend"));
        assert_eq!(values.currency, "INR");
        assert_eq!(values.days.as_deref(), Some("5,6"));
        assert_eq!(values.start_time.as_deref(), Some("09:00"));
        assert_eq!(values.end_time, None);
    }

    #[test]
    fn test_validate_rule_rejects_bad_currency() {
        let req = PricingRuleRequest {
            currency: "RUPEE".to_string(),
            ..request()
        };
        assert!(matches!(
            validate_rule(req),
            Err(PricingError::Validation { ref field, .. }) if field == "currency"
        ));
    }

    #[test]
    fn test_validate_rule_rejects_negative_price() {
        let req = PricingRuleRequest {
            child_cents: -1,
            ..request()
        };
        assert!(validate_rule(req).is_err());
    }

    #[test]
    fn test_validate_rule_rejects_inverted_dates() {
        let req = PricingRuleRequest {
            start_date: chrono::NaiveDate::from_ymd_opt(2025, 12, 31),
            end_date: chrono::NaiveDate::from_ymd_opt(2025, 1, 1),
            ..request()
        };
        assert!(validate_rule(req).is_err());
    }

    #[test]
    fn test_validate_rule_rejects_bad_time_and_day() {
        let req = PricingRuleRequest {
            end_time: Some("noon".to_string()),
            ..request()
        };
        assert!(validate_rule(req).is_err());

        let req = PricingRuleRequest {
            days: Some(vec![7]),
            ..request()
        };
        assert!(validate_rule(req).is_err());
    }

    #[test]
    fn test_validate_rule_rejects_negative_day() {
        let req: PricingRuleRequest =
            serde_json::from_str(r#"{"days": [5, -1], "adult_cents": 100}"#).unwrap();
        let err = validate_rule(req).unwrap_err();
        assert_eq!(err.to_string(), "days must be between 0 (Monday) and 6 (Sunday)");
    }

    #[test]
    fn test_validate_rule_empty_days_is_unrestricted() {
        let req = PricingRuleRequest {
            days: Some(vec![]),
            ..request()
        };
        assert_eq!(validate_rule(req).unwrap().days, None);
    }
}
