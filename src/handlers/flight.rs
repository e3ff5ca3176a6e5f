use axum::extract::{Path, Query, State};
use axum::response::Response;
use serde_json::json;
use std::sync::Arc;

use super::parse_id;
use crate::error::ApiError;
use crate::models::{CreateFlightRequest, FlightSearch};
use crate::response::ApiResponse;
use crate::services::flight;
use crate::state::AppState;
use crate::validation::ValidatedJson;

pub async fn create_flight_handler(
    State(state): State<Arc<AppState>>,
    ValidatedJson(payload): ValidatedJson<CreateFlightRequest>,
) -> Result<Response, ApiError> {
    let created = flight::create_flight(state.db.as_ref(), payload).await?;
    Ok(ApiResponse::success(json!({ "flight": created }), "Flight created successfully").created())
}

// GET /api/flight?origin=&destination=&date=
pub async fn list_flights_handler(
    State(state): State<Arc<AppState>>,
    Query(search): Query<FlightSearch>,
) -> Result<Response, ApiError> {
    let flights = flight::search_flights(state.db.as_ref(), &search).await?;
    Ok(ApiResponse::success(json!({ "flights": flights }), "Flights retrieved successfully").ok())
}

pub async fn get_flight_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id = parse_id(&id, "flight")?;
    let found = flight::get_flight(state.db.as_ref(), id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Flight not found".to_string()))?;
    Ok(ApiResponse::success(json!({ "flight": found }), "Flight retrieved successfully").ok())
}
