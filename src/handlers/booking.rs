use axum::extract::{Path, Query, State};
use axum::response::Response;
use serde_json::Value;
use std::sync::Arc;

use crate::error::ApiError;
use crate::models::{CreateBookingRequest, PageQuery, UpdateBookingRequest, UserBookingsQuery};
use crate::response::ApiResponse;
use crate::services::booking;
use crate::state::AppState;
use crate::validation::ValidatedJson;

pub async fn create_booking_handler(
    State(state): State<Arc<AppState>>,
    ValidatedJson(payload): ValidatedJson<CreateBookingRequest>,
) -> Result<Response, ApiError> {
    let created = booking::create_booking(state.db.as_ref(), payload).await?;
    Ok(ApiResponse::success(created, "Booking created successfully").created())
}

pub async fn get_booking_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let found = booking::get_booking(state.db.as_ref(), &id).await?;
    Ok(ApiResponse::success(found, "Booking retrieved successfully").ok())
}

// GET /api/booking?user_id=
pub async fn user_bookings_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UserBookingsQuery>,
) -> Result<Response, ApiError> {
    let user_id = query
        .user_id
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Invalid user ID".to_string()))?;
    let bookings = booking::bookings_for_user(state.db.as_ref(), &user_id).await?;
    Ok(ApiResponse::success(bookings, "User bookings retrieved successfully").ok())
}

pub async fn all_bookings_handler(
    State(state): State<Arc<AppState>>,
    Query(page): Query<PageQuery>,
) -> Result<Response, ApiError> {
    let bookings = booking::all_bookings(state.db.as_ref(), page).await?;
    Ok(ApiResponse::success(bookings, "All bookings retrieved successfully").ok())
}

pub async fn update_booking_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateBookingRequest>,
) -> Result<Response, ApiError> {
    let updated = booking::update_booking(state.db.as_ref(), &id, payload).await?;
    Ok(ApiResponse::success(updated, "Booking updated successfully").ok())
}

pub async fn delete_booking_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    booking::delete_booking(state.db.as_ref(), &id).await?;
    Ok(ApiResponse::success(Value::Null, "Booking deleted successfully").ok())
}
