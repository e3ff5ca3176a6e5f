use axum::extract::{Path, State};
use axum::response::Response;
use serde_json::json;
use std::sync::Arc;

use super::parse_id;
use crate::error::ApiError;
use crate::models::{CreatePassengerRequest, UpdatePassengerRequest};
use crate::response::ApiResponse;
use crate::services::passenger;
use crate::state::AppState;
use crate::validation::ValidatedJson;

pub async fn create_passenger_handler(
    State(state): State<Arc<AppState>>,
    ValidatedJson(payload): ValidatedJson<CreatePassengerRequest>,
) -> Result<Response, ApiError> {
    let created = passenger::create_passenger(state.db.as_ref(), payload).await?;
    Ok(ApiResponse::success(created, "Passenger created successfully").created())
}

pub async fn user_passengers_handler(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Response, ApiError> {
    if user_id.trim().is_empty() {
        return Err(ApiError::BadRequest("User ID is required".to_string()));
    }
    let passengers = passenger::passengers_for_user(state.db.as_ref(), &user_id).await?;
    Ok(ApiResponse::success(passengers, "Passengers fetched successfully").ok())
}

pub async fn get_passenger_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id = parse_id(&id, "passenger")?;
    let found = passenger::get_passenger(state.db.as_ref(), id).await?;
    Ok(ApiResponse::success(found, "Passenger fetched successfully").ok())
}

pub async fn update_passenger_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdatePassengerRequest>,
) -> Result<Response, ApiError> {
    let id = parse_id(&id, "passenger")?;
    let updated = passenger::update_passenger(state.db.as_ref(), id, payload).await?;
    Ok(ApiResponse::success(updated, "Passenger updated successfully").ok())
}

pub async fn delete_passenger_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id = parse_id(&id, "passenger")?;
    passenger::delete_passenger(state.db.as_ref(), id).await?;
    Ok(ApiResponse::success(json!({ "deleted": true }), "Passenger deleted successfully").ok())
}
