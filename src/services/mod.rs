pub mod booking;
pub mod flight;
pub mod passenger;

pub const FLIGHTS: &str = "flights";
pub const PASSENGERS: &str = "passengers";
pub const BOOKINGS: &str = "bookings";
