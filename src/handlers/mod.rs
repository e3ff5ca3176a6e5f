mod admin;
mod booking;
mod flight;
mod general;
mod metrics;
mod passenger;

pub use admin::{banned_ips_handler, unban_ip_handler};
pub use booking::{
    all_bookings_handler, create_booking_handler, delete_booking_handler, get_booking_handler,
    update_booking_handler, user_bookings_handler,
};
pub use flight::{create_flight_handler, get_flight_handler, list_flights_handler};
pub use general::{health_handler, hello_handler, not_found_handler, root_handler};
pub use metrics::metrics_handler;
pub use passenger::{
    create_passenger_handler, delete_passenger_handler, get_passenger_handler,
    update_passenger_handler, user_passengers_handler,
};

use crate::error::ApiError;

// Numeric path ids
fn parse_id(raw: &str, what: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| ApiError::BadRequest(format!("Invalid {what} ID format")))
}
