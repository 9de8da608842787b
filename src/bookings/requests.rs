//! Request DTOs for booking endpoints.

use serde::Deserialize;
use serde_json::Value;

use crate::pricing::requests::VisitRequest;
use crate::pricing::PricingError;

/// Request to create a booking
///
/// Payment state is not an input; bookings start unpaid.
#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
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

impl CreateBookingRequest {
    /// Caller-level validation of the visit fields
    pub fn visit(&self) -> Result<VisitRequest, PricingError> {
        let visit = VisitRequest::parse(
            self.date.as_ref().and_then(Value::as_str),
            self.time_slot.as_deref(),
            self.num_adults,
            self.num_children,
        )?;
        if i32::try_from(visit.num_adults).is_err() || i32::try_from(visit.num_children).is_err() {
            return Err(PricingError::Validation {
                field: "party".to_string(),
                message: "party size is too large".to_string(),
            });
        }
        Ok(visit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_booking_defaults() {
        let req: CreateBookingRequest = serde_json::from_str(r#"{"date": "2025-09-10"}"#).unwrap();
        let visit = req.visit().unwrap();
        assert_eq!(visit.time_slot, "09:00-11:00");
        assert_eq!(visit.num_adults, 1);
        assert_eq!(visit.num_children, 0);
    }

    #[test]
    fn test_create_booking_bad_date() {
        let req: CreateBookingRequest =
            serde_json::from_str(r#"{"date": "tomorrow", "num_adults": 2}"#).unwrap();
        assert!(req.visit().is_err());
    }

    #[test]
    fn test_create_booking_party_too_large() {
        let req = CreateBookingRequest {
            date: Some(Value::from("2025-09-10")),
            time_slot: None,
            num_adults: i64::from(u32::MAX),
            num_children: 0,
        };
        assert!(req.visit().is_err());
    }

    #[test]
    fn test_create_booking_non_string_date() {
        let req: CreateBookingRequest = serde_json::from_str(r#"{"date": ["2025-09-10"]}"#).unwrap();
        let err = req.visit().unwrap_err();
        assert_eq!(err.to_string(), "invalid date format");
    }
}
