use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::sync::Arc;

use crate::response::ApiResponse;
use crate::state::AppState;

// Get banned IPs
pub async fn banned_ips_handler(State(state): State<Arc<AppState>>) -> Response {
    let banned: Vec<String> = state.limiter.list_banned_ips().into_iter().collect();
    ApiResponse::success(json!({ "bannedIPs": banned }), "Banned IPs retrieved successfully").ok()
}

// Unban an IP, exact string match
pub async fn unban_ip_handler(
    State(state): State<Arc<AppState>>,
    Path(ip): Path<String>,
) -> Response {
    if state.limiter.unban(&ip) {
        let message = format!("IP {ip} has been unbanned");
        ApiResponse::success(json!({ "ip": ip }), message).ok()
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error(format!("IP {ip} is not banned"))),
        )
            .into_response()
    }
}
