//! Booking row model.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Booking from bookings
#[derive(Debug, Clone, FromRow)]
pub struct Booking {
    pub id: Uuid,
    pub user_id: Option<String>,
    pub date: NaiveDate,
    pub time_slot: String,
    pub num_adults: i32,
    pub num_children: i32,
    pub price_cents: i64,
    pub currency: String,
    pub paid: bool,
    /// Base64 PNG of the `booking:<id>` QR payload
    pub qr_code_b64: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    /// Text encoded in the booking's QR code
    pub fn qr_payload(id: Uuid) -> String {
        format!("booking:{}", id)
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id.as_deref() == Some(user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qr_payload() {
        let id = Uuid::nil();
        assert_eq!(
            Booking::qr_payload(id),
            "booking:00000000-0000-0000-0000-000000000000"
        );
    }
}
