//! Visitor bookings with QR tickets.

pub mod models;
pub mod qr;
pub mod queries;
pub mod requests;
pub mod responses;
pub mod routes;

pub use models::Booking;
pub use routes::router;
