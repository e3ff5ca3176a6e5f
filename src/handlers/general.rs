use axum::extract::State;
use axum::http::{StatusCode, Uri};
use axum::response::IntoResponse;
use axum::Json;
use std::sync::Arc;

use crate::response::{ApiResponse, timestamp};
use crate::state::AppState;

// Root handler
pub async fn root_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "Welcome to Flight Booking Engine API",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
        "timestamp": timestamp()
    }))
}

pub async fn hello_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "Hello World from Flight Booking Engine!",
        "timestamp": timestamp(),
        "endpoints": {
            "flights": "/api/flight",
            "passengers": "/api/passenger",
            "bookings": "/api/booking"
        }
    }))
}

// health handler
pub async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "uptime": state.started_at.elapsed().as_secs_f64(),
        "timestamp": timestamp()
    }))
}

pub async fn not_found_handler(uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::error(format!("Route {} not found", uri.path()))),
    )
}
