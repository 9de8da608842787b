//! Ticket pricing module.
//!
//! Resolves a visit's tariff from the admin-maintained, prioritized rule
//! set and exposes the rule administration endpoints.

pub mod calculators;
pub mod models;
pub mod queries;
pub mod requests;
pub mod responses;
pub mod routes;
pub mod services;

// Re-export commonly used items
pub use calculators::{resolve, CheckOutcome, PriceQuote};
pub use models::{PricingRule, Tariff};
pub use routes::router;
pub use services::PricingError;
