use chrono::{DateTime, NaiveDate, Utc};
use serde_json::json;
use tracing::info;

use super::FLIGHTS;
use crate::db::{Database, Query, decode, decode_all, encode};
use crate::error::ApiError;
use crate::models::{CreateFlightRequest, DEFAULT_TOTAL_SEATS, Flight, FlightSearch, NewFlight};

/// Checks the schedule and fills in the derived columns.
pub fn plan_flight(req: CreateFlightRequest, now: DateTime<Utc>) -> Result<NewFlight, ApiError> {
    if req.arrival_time <= req.departure_time {
        return Err(ApiError::Validation(
            "arrival_time: arrival_time must be after departure_time".to_string(),
        ));
    }

    let seconds = (req.arrival_time - req.departure_time).num_seconds();
    let duration = (seconds as f64 / 60.0).round() as i64;
    if let Some(given) = req.duration {
        if given != duration {
            return Err(ApiError::Validation(format!(
                "duration: duration must equal {duration} minutes"
            )));
        }
    }

    let total_seats = req.total_seats.unwrap_or(DEFAULT_TOTAL_SEATS);

    Ok(NewFlight {
        flight_number: req.flight_number,
        airline: req.airline,
        origin: req.origin,
        destination: req.destination,
        departure_time: req.departure_time,
        arrival_time: req.arrival_time,
        duration,
        price: req.price,
        seats_available: total_seats,
        total_seats,
        cabin_class: req.cabin_class,
        created_at: now,
        updated_at: now,
    })
}

pub async fn create_flight(db: &dyn Database, req: CreateFlightRequest) -> Result<Flight, ApiError> {
    let new_flight = plan_flight(req, Utc::now())?;
    let row = db.insert(FLIGHTS, encode(&new_flight)?).await?;
    let flight: Flight = decode(row)?;
    info!(flight_id = flight.flight_id, flight_number = %flight.flight_number, "flight created");
    Ok(flight)
}

pub async fn get_flight(db: &dyn Database, flight_id: i64) -> Result<Option<Flight>, ApiError> {
    let rows = db.query(FLIGHTS, &Query::new().eq("flight_id", flight_id)).await?;
    Ok(decode_all(rows)?.into_iter().next())
}

pub async fn search_flights(db: &dyn Database, search: &FlightSearch) -> Result<Vec<Flight>, ApiError> {
    let day = match search.date.as_deref() {
        Some(raw) => Some(
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| ApiError::BadRequest(format!("Invalid date: {raw}")))?,
        ),
        None => None,
    };

    let mut query = Query::new().order("departure_time", true);
    if let Some(origin) = &search.origin {
        query = query.eq("origin", origin);
    }
    if let Some(destination) = &search.destination {
        query = query.eq("destination", destination);
    }

    let flights: Vec<Flight> = decode_all(db.query(FLIGHTS, &query).await?)?;
    Ok(match day {
        Some(day) => flights.into_iter().filter(|f| f.departs_on(day)).collect(),
        None => flights,
    })
}

pub async fn set_seats_available(db: &dyn Database, flight_id: i64, seats: i64) -> Result<(), ApiError> {
    let patch = json!({ "seats_available": seats, "updated_at": Utc::now() });
    db.update_by_field(FLIGHTS, "flight_id", &flight_id.to_string(), patch)
        .await?
        .ok_or_else(|| ApiError::NotFound("Flight not found".to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CabinClass;

    fn request(dep: &str, arr: &str, duration: Option<i64>) -> CreateFlightRequest {
        CreateFlightRequest {
            flight_number: "AI101".to_string(),
            airline: "Air India".to_string(),
            origin: "BOM".to_string(),
            destination: "DEL".to_string(),
            departure_time: dep.parse().unwrap(),
            arrival_time: arr.parse().unwrap(),
            duration,
            price: 8500.0,
            total_seats: None,
            cabin_class: CabinClass::Economy,
        }
    }

    #[test]
    fn computes_duration_and_default_capacity() {
        let req = request("2025-03-01T06:00:00Z", "2025-03-01T08:10:29Z", None);
        let planned = plan_flight(req, Utc::now()).unwrap();
        assert_eq!(planned.duration, 130);
        assert_eq!(planned.total_seats, 222);
        assert_eq!(planned.seats_available, 222);
    }

    #[test]
    fn rejects_mismatched_duration() {
        let req = request("2025-03-01T06:00:00Z", "2025-03-01T08:00:00Z", Some(90));
        let err = plan_flight(req, Utc::now()).unwrap_err();
        assert!(err.to_string().contains("must equal 120 minutes"));
    }

    #[test]
    fn rejects_arrival_before_departure() {
        let req = request("2025-03-01T08:00:00Z", "2025-03-01T08:00:00Z", None);
        assert!(matches!(plan_flight(req, Utc::now()), Err(ApiError::Validation(_))));
    }
}
