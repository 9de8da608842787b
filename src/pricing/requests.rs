//! Request DTOs for pricing API endpoints.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use serde_json::Value;

use super::services::PricingError;

/// Time slot used when a caller omits one
pub const DEFAULT_TIME_SLOT: &str = "09:00-11:00";

/// Longest time slot the bookings table stores
pub const MAX_TIME_SLOT_LEN: usize = 50;

/// Request to quote a visit
#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    /// Kept loose so a non-string date fails as an invalid date
    #[serde(default)]
    pub date: Option<Value>,
    #[serde(default)]
    pub time_slot: Option<String>,
    #[serde(default = "default_adults")]
    pub num_adults: i64,
    #[serde(default)]
    pub num_children: i64,
}

fn default_adults() -> i64 {
    1
}

/// Request to create or replace a pricing rule
#[derive(Debug, Clone, Deserialize)]
pub struct PricingRuleRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Signed so out-of-range weekdays reach validation
    #[serde(default)]
    pub days: Option<Vec<i64>>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub adult_cents: i64,
    #[serde(default)]
    pub child_cents: i64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub priority: i32,
}

fn default_currency() -> String {
    "INR".to_string()
}

/// Visit details after caller-level validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitRequest {
    pub date: NaiveDate,
    pub time_slot: String,
    pub num_adults: u32,
    pub num_children: u32,
}

impl VisitRequest {
    /// Validate raw visit fields, applying the time slot default.
    pub fn parse(
        date: Option<&str>,
        time_slot: Option<&str>,
        num_adults: i64,
        num_children: i64,
    ) -> Result<Self, PricingError> {
        let date = date
            .and_then(parse_visit_date)
            .ok_or_else(|| PricingError::Validation {
                field: "date".to_string(),
                message: "invalid date format".to_string(),
            })?;

        let time_slot = time_slot
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_TIME_SLOT)
            .to_string();
        if time_slot.chars().count() > MAX_TIME_SLOT_LEN {
            return Err(PricingError::Validation {
                field: "time_slot".to_string(),
                message: format!("time_slot must be at most {} characters", MAX_TIME_SLOT_LEN),
            });
        }

        Ok(Self {
            date,
            time_slot,
            num_adults: party_count("num_adults", num_adults)?,
            num_children: party_count("num_children", num_children)?,
        })
    }
}

impl TryFrom<QuoteRequest> for VisitRequest {
    type Error = PricingError;

    fn try_from(req: QuoteRequest) -> Result<Self, Self::Error> {
        VisitRequest::parse(
            req.date.as_ref().and_then(Value::as_str),
            req.time_slot.as_deref(),
            req.num_adults,
            req.num_children,
        )
    }
}

fn party_count(field: &str, value: i64) -> Result<u32, PricingError> {
    u32::try_from(value).map_err(|_| PricingError::Validation {
        field: field.to_string(),
        message: format!("{} must be a non-negative integer", field),
    })
}

/// Parse an ISO visit date, accepting a full timestamp and keeping its date.
///
/// Timestamps with a UTC offset keep the date as written in that offset.
pub fn parse_visit_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Some(dt) = ["%Y-%m-%dT%H:%M:%S%.f%:z", "%Y-%m-%dT%H:%M%:z", "%Y-%m-%d %H:%M:%S%.f%:z"]
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(raw, fmt).ok())
    {
        return Some(dt.date_naive());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.date())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_visit_date_forms() {
        let expected = NaiveDate::from_ymd_opt(2025, 9, 10);
        assert_eq!(parse_visit_date("2025-09-10"), expected);
        assert_eq!(parse_visit_date("2025-09-10T10:30:00"), expected);
        assert_eq!(parse_visit_date("2025-09-10T10:30"), expected);
        assert_eq!(parse_visit_date("2025-09-10T10:30:00+05:30"), expected);
        assert_eq!(parse_visit_date("2025-09-10T10:30:00Z"), expected);
        assert_eq!(parse_visit_date("2025-09-10T10:30:00.250-04:00"), expected);
        assert_eq!(parse_visit_date("2025-09-10T23:30+05:30"), expected);
        assert_eq!(parse_visit_date("10/09/2025"), None);
        assert_eq!(parse_visit_date(""), None);
    }

    #[test]
    fn test_visit_request_defaults() {
        let req: QuoteRequest = serde_json::from_str(r#"{"date": "2025-09-10"}"#).unwrap();
        let visit = VisitRequest::try_from(req).unwrap();
        assert_eq!(visit.time_slot, DEFAULT_TIME_SLOT);
        assert_eq!(visit.num_adults, 1);
        assert_eq!(visit.num_children, 0);
    }

    #[test]
    fn test_visit_request_blank_slot_uses_default() {
        let visit = VisitRequest::parse(Some("2025-09-10"), Some("  "), 2, 1).unwrap();
        assert_eq!(visit.time_slot, DEFAULT_TIME_SLOT);
    }

    #[test]
    fn test_visit_request_missing_date() {
        let err = VisitRequest::parse(None, None, 1, 0).unwrap_err();
        assert!(err.to_string().contains("invalid date format"));
    }

    #[test]
    fn test_visit_request_non_string_date() {
        let req: QuoteRequest = serde_json::from_str(r#"{"date": 20250910}"#).unwrap();
        let err = VisitRequest::try_from(req).unwrap_err();
        assert_eq!(err.to_string(), "invalid date format");
    }

    #[test]
    fn test_visit_request_time_slot_too_long() {
        let slot = format!("09:00-11:00 {}", "x".repeat(MAX_TIME_SLOT_LEN));
        let err = VisitRequest::parse(Some("2025-09-10"), Some(&slot), 1, 0).unwrap_err();
        assert!(err.to_string().contains("time_slot"));

        let slot = "9".repeat(MAX_TIME_SLOT_LEN);
        assert!(VisitRequest::parse(Some("2025-09-10"), Some(&slot), 1, 0).is_ok());
    }

    #[test]
    fn test_visit_request_negative_count() {
        let err = VisitRequest::parse(Some("2025-09-10"), None, 1, -2).unwrap_err();
        assert!(err.to_string().contains("num_children"));
    }

    #[test]
    fn test_rule_request_defaults() {
        let req: PricingRuleRequest = serde_json::from_str(r#"{"adult_cents": 100}"#).unwrap();
        assert_eq!(req.currency, "INR");
        assert_eq!(req.priority, 0);
        assert_eq!(req.child_cents, 0);
        assert!(req.days.is_none());
    }
}
