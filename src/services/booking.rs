use chrono::Utc;
use tracing::info;

use super::flight::{get_flight, set_seats_available};
use super::passenger::find_passenger;
use super::BOOKINGS;
use crate::db::{Database, Query, decode, decode_all, encode};
use crate::error::ApiError;
use crate::models::{
    Booking, CreateBookingRequest, Flight, NewBooking, PageQuery, PaymentStatus,
    UpdateBookingRequest,
};

/// Price to charge and seats left on the flight after booking `passengers`.
pub fn price_booking(
    flight: &Flight,
    passengers: usize,
    requested_price: Option<f64>,
) -> Result<(f64, i64), ApiError> {
    let count = passengers as i64;
    if flight.seats_available < count {
        return Err(ApiError::BadRequest("Not enough seats available".to_string()));
    }

    // zero means "not supplied"
    let total = requested_price
        .filter(|p| *p > 0.0)
        .unwrap_or(flight.price * passengers as f64);

    Ok((total, flight.seats_available - count))
}

pub async fn create_booking(db: &dyn Database, req: CreateBookingRequest) -> Result<Booking, ApiError> {
    let flight = get_flight(db, req.flight_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Flight not found".to_string()))?;

    for id in &req.passenger_info {
        if find_passenger(db, *id).await?.is_none() {
            return Err(ApiError::NotFound(format!(
                "Passenger with ID {id} not found"
            )));
        }
    }

    let (total_price, seats_left) =
        price_booking(&flight, req.passenger_info.len(), req.total_price)?;

    let now = Utc::now();
    let row = NewBooking {
        user_id: req.user_id,
        flight_id: req.flight_id,
        booking_type: req.booking_type,
        passenger_info: req.passenger_info,
        payment_status: PaymentStatus::Pending,
        total_price,
        payment_method: req.payment_method,
        seat_numbers: req.seat_numbers,
        special_requests: req.special_requests.unwrap_or_default(),
        booking_source: req.booking_source,
        promocode_used: req.promocode_used,
        created_at: now,
        updated_at: now,
    };

    let booking: Booking = decode(db.insert(BOOKINGS, encode(&row)?).await?)?;
    set_seats_available(db, flight.flight_id, seats_left).await?;

    info!(booking_id = %booking.booking_id, seats_left, "booking created");
    Ok(booking)
}

pub async fn get_booking(db: &dyn Database, booking_id: &str) -> Result<Booking, ApiError> {
    let rows = db
        .query(BOOKINGS, &Query::new().eq("booking_id", booking_id))
        .await?;
    decode_all::<Booking>(rows)?
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::NotFound("Booking not found".to_string()))
}

pub async fn bookings_for_user(db: &dyn Database, user_id: &str) -> Result<Vec<Booking>, ApiError> {
    let rows = db.query(BOOKINGS, &Query::new().eq("user_id", user_id)).await?;
    Ok(decode_all(rows)?)
}

/// Newest first. `offset` only applies together with `limit`.
pub async fn all_bookings(db: &dyn Database, page: PageQuery) -> Result<Vec<Booking>, ApiError> {
    let mut query = Query::new().order("created_at", false);
    if let Some(limit) = page.limit {
        query = query.limit(limit);
    }
    if let Some(offset) = page.offset {
        query = query.offset(offset);
    }
    let rows = db.query(BOOKINGS, &query).await?;
    Ok(decode_all(rows)?)
}

pub async fn update_booking(
    db: &dyn Database,
    booking_id: &str,
    req: UpdateBookingRequest,
) -> Result<Booking, ApiError> {
    get_booking(db, booking_id).await?;

    let mut patch = encode(&req)?;
    if let Some(obj) = patch.as_object_mut() {
        obj.insert("updated_at".to_string(), encode(&Utc::now())?);
    }

    let row = db
        .update_by_field(BOOKINGS, "booking_id", booking_id, patch)
        .await?
        .ok_or_else(|| ApiError::NotFound("Booking not found".to_string()))?;
    info!(booking_id, "booking updated");
    Ok(decode(row)?)
}

pub async fn delete_booking(db: &dyn Database, booking_id: &str) -> Result<(), ApiError> {
    let booking = get_booking(db, booking_id).await?;

    // confirmed bookings were holding seats
    if booking.payment_status == PaymentStatus::Confirmed {
        if let Some(flight) = get_flight(db, booking.flight_id).await? {
            let restored = flight.seats_available + booking.passenger_info.len() as i64;
            set_seats_available(db, flight.flight_id, restored).await?;
        }
    }

    db.delete_by_field(BOOKINGS, "booking_id", booking_id).await?;
    info!(booking_id, "booking deleted");
    Ok(())
}
