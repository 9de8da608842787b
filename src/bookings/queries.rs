//! Database queries for bookings.

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;
use crate::pricing::requests::VisitRequest;
use crate::pricing::PriceQuote;

use super::models::Booking;

const BOOKING_COLUMNS: &str = r#"
    id, user_id, date, time_slot, num_adults, num_children,
    price_cents, currency, paid, qr_code_b64, created_at
"#;

/// Insert a fully priced booking
pub async fn insert_booking(pool: &PgPool, booking: &NewBooking) -> Result<Booking, AppError> {
    let row = sqlx::query_as::<_, Booking>(&format!(
        r#"
        INSERT INTO bookings (
            id, user_id, date, time_slot, num_adults, num_children,
            price_cents, currency, paid, qr_code_b64
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING {BOOKING_COLUMNS}
        "#
    ))
    .bind(booking.id)
    .bind(&booking.user_id)
    .bind(booking.date)
    .bind(&booking.time_slot)
    .bind(booking.num_adults)
    .bind(booking.num_children)
    .bind(booking.price_cents)
    .bind(&booking.currency)
    .bind(booking.paid)
    .bind(&booking.qr_code_b64)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Values for a booking about to be inserted
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub id: Uuid,
    pub user_id: Option<String>,
    pub date: chrono::NaiveDate,
    pub time_slot: String,
    pub num_adults: i32,
    pub num_children: i32,
    pub price_cents: i64,
    pub currency: String,
    pub paid: bool,
    pub qr_code_b64: Option<String>,
}

impl NewBooking {
    /// Unpaid booking for a validated, priced visit
    pub fn priced(
        id: Uuid,
        user_id: &str,
        visit: VisitRequest,
        quote: PriceQuote,
        qr_code_b64: String,
    ) -> Self {
        Self {
            id,
            user_id: Some(user_id.to_string()),
            date: visit.date,
            time_slot: visit.time_slot,
            // Counts were range-checked against i32 by CreateBookingRequest::visit
            num_adults: visit.num_adults as i32,
            num_children: visit.num_children as i32,
            price_cents: quote.total_cents,
            currency: quote.currency,
            paid: false,
            qr_code_b64: Some(qr_code_b64),
        }
    }
}

/// List every booking, newest first
pub async fn list_all(pool: &PgPool) -> Result<Vec<Booking>, AppError> {
    let rows = sqlx::query_as::<_, Booking>(&format!(
        r#"
        SELECT {BOOKING_COLUMNS}
        FROM bookings
        ORDER BY created_at DESC
        "#
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// List bookings made by one user, newest first
pub async fn list_for_user(pool: &PgPool, user_id: &str) -> Result<Vec<Booking>, AppError> {
    let rows = sqlx::query_as::<_, Booking>(&format!(
        r#"
        SELECT {BOOKING_COLUMNS}
        FROM bookings
        WHERE user_id = $1
        ORDER BY created_at DESC
        "#
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn get_booking(pool: &PgPool, id: Uuid) -> Result<Option<Booking>, AppError> {
    let row = sqlx::query_as::<_, Booking>(&format!(
        r#"
        SELECT {BOOKING_COLUMNS}
        FROM bookings
        WHERE id = $1
        "#
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Mark a booking as paid
pub async fn mark_paid(pool: &PgPool, id: Uuid) -> Result<Option<Booking>, AppError> {
    let row = sqlx::query_as::<_, Booking>(&format!(
        r#"
        UPDATE bookings
        SET paid = TRUE
        WHERE id = $1
        RETURNING {BOOKING_COLUMNS}
        "#
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bookings::requests::CreateBookingRequest;

    fn quote() -> PriceQuote {
        PriceQuote {
            total_cents: 62_000,
            currency: "INR".to_string(),
            rule_id: None,
            rule_name: None,
            time_unverified: false,
        }
    }

    #[test]
    fn test_new_booking_ignores_client_paid_flag() {
        let req: CreateBookingRequest = serde_json::from_str(
            r#"{"date": "2025-09-13", "num_adults": 2, "num_children": 1, "paid": true}"#,
        )
        .unwrap();
        let visit = req.visit().unwrap();

        let booking = NewBooking::priced(Uuid::nil(), "7", visit, quote(), "qr".to_string());
        assert!(!booking.paid);
        assert_eq!(booking.user_id.as_deref(), Some("7"));
        assert_eq!(booking.num_adults, 2);
        assert_eq!(booking.num_children, 1);
        assert_eq!(booking.price_cents, 62_000);
    }
}
