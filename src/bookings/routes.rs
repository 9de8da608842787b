//! Booking route handlers

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::{AppError, Result};
use crate::pricing::services as pricing;
use crate::AppState;

use super::models::Booking;
use super::qr::generate_qr_base64;
use super::queries::{self, NewBooking};
use super::requests::CreateBookingRequest;
use super::responses::{BookingResponse, PaymentResponse};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/bookings", get(list_bookings).post(create_booking))
        .route("/api/bookings/:id/pay", post(pay_booking))
}

/// Create a booking for the caller, priced from the current rule snapshot
async fn create_booking(
    State(state): State<AppState>,
    user: AuthUser,
    payload: std::result::Result<Json<CreateBookingRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<BookingResponse>)> {
    let Json(req) = payload?;
    let visit = req.visit()?;
    let quote = pricing::quote(&state.db, &state.cache, &visit).await?;

    let id = Uuid::new_v4();
    let qr_code_b64 = generate_qr_base64(&Booking::qr_payload(id))?;

    let booking = queries::insert_booking(
        &state.db,
        &NewBooking::priced(id, &user.user_id, visit, quote, qr_code_b64),
    )
    .await?;

    tracing::info!(
        booking_id = %booking.id,
        user_id = %user.user_id,
        price_cents = booking.price_cents,
        "Booking created"
    );

    Ok((StatusCode::CREATED, Json(booking.into())))
}

/// Admins see every booking; everyone else sees their own
async fn list_bookings(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<BookingResponse>>> {
    let bookings = if user.is_admin() {
        queries::list_all(&state.db).await?
    } else {
        queries::list_for_user(&state.db, &user.user_id).await?
    };
    Ok(Json(bookings.into_iter().map(BookingResponse::from).collect()))
}

/// Payment stub: marks the booking as paid
async fn pay_booking(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<PaymentResponse>> {
    let booking = queries::get_booking(&state.db, id)
        .await?
        .ok_or(AppError::NotFound)?;
    if !user.is_admin() && !booking.is_owned_by(&user.user_id) {
        return Err(AppError::Forbidden);
    }

    let booking = queries::mark_paid(&state.db, id)
        .await?
        .ok_or(AppError::NotFound)?;
    tracing::info!(booking_id = %booking.id, "Payment recorded");

    Ok(Json(PaymentResponse {
        msg: "payment recorded".to_string(),
        booking: booking.into(),
    }))
}
