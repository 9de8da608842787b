//! Response DTOs for booking endpoints.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::pricing::responses::MoneyResponse;

use super::models::Booking;

#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub id: Uuid,
    pub user_id: Option<String>,
    pub date: NaiveDate,
    pub time_slot: String,
    pub num_adults: i32,
    pub num_children: i32,
    pub price_cents: i64,
    pub currency: String,
    pub price: MoneyResponse,
    pub paid: bool,
    pub qr_code_b64: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Booking> for BookingResponse {
    fn from(b: Booking) -> Self {
        Self {
            price: MoneyResponse::from_minor(b.price_cents, &b.currency),
            id: b.id,
            user_id: b.user_id,
            date: b.date,
            time_slot: b.time_slot,
            num_adults: b.num_adults,
            num_children: b.num_children,
            price_cents: b.price_cents,
            currency: b.currency,
            paid: b.paid,
            qr_code_b64: b.qr_code_b64,
            created_at: b.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    pub msg: String,
    pub booking: BookingResponse,
}
