use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation::{FLIGHT_NUMBER_RE, IATA_RE};

// Seat count of the default aircraft (Airbus A321)
pub const DEFAULT_TOTAL_SEATS: i64 = 222;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CabinClass {
    Economy,
    #[serde(rename = "Premium Economy")]
    PremiumEconomy,
    Business,
    First,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flight {
    pub flight_id: i64,
    pub flight_number: String,
    pub airline: String,
    pub origin: String,
    pub destination: String,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    // minutes
    pub duration: i64,
    pub price: f64,
    pub seats_available: i64,
    pub total_seats: i64,
    pub cabin_class: CabinClass,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Flight {
    pub fn departs_on(&self, date: NaiveDate) -> bool {
        self.departure_time.date_naive() == date
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateFlightRequest {
    #[validate(regex(path = "FLIGHT_NUMBER_RE", message = "2-8 uppercase letters/digits"))]
    pub flight_number: String,
    #[validate(length(min = 1, message = "airline is required"))]
    pub airline: String,
    #[validate(regex(path = "IATA_RE", message = "IATA code (AAA)"))]
    pub origin: String,
    #[validate(regex(path = "IATA_RE", message = "IATA code (AAA)"))]
    pub destination: String,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    // optional, must match the schedule when supplied
    pub duration: Option<i64>,
    #[validate(range(min = 0.0, message = "price must not be negative"))]
    pub price: f64,
    #[validate(range(min = 1, message = "total_seats must be positive"))]
    pub total_seats: Option<i64>,
    pub cabin_class: CabinClass,
}

/// Row written on flight creation.
#[derive(Debug, Clone, Serialize)]
pub struct NewFlight {
    pub flight_number: String,
    pub airline: String,
    pub origin: String,
    pub destination: String,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub duration: i64,
    pub price: f64,
    pub seats_available: i64,
    pub total_seats: i64,
    pub cabin_class: CabinClass,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlightSearch {
    pub origin: Option<String>,
    pub destination: Option<String>,
    // YYYY-MM-DD, matched against the departure day (UTC)
    pub date: Option<String>,
}
