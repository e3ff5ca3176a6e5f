use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::handlers::*;
use crate::middleware::rate_limit_middleware;
use crate::state::AppState;

fn admin_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/banned-ips", get(banned_ips_handler))
        .route("/unban-ip/{ip}", post(unban_ip_handler))
}

fn flight_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_flight_handler).get(list_flights_handler))
        .route("/{id}", get(get_flight_handler))
}

fn passenger_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_passenger_handler))
        .route("/user/{user_id}", get(user_passengers_handler))
        .route(
            "/{passenger_id}",
            get(get_passenger_handler)
                .put(update_passenger_handler)
                .delete(delete_passenger_handler),
        )
}

fn booking_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_booking_handler).get(user_bookings_handler))
        .route("/admin/all", get(all_bookings_handler))
        .route(
            "/{id}",
            get(get_booking_handler)
                .put(update_booking_handler)
                .delete(delete_booking_handler),
        )
}

/// Every route, behind the rate limiter.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/api/hello", get(hello_handler))
        .route("/api/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .nest("/api/admin", admin_routes())
        .nest("/api/flight", flight_routes())
        .nest("/api/passenger", passenger_routes())
        .nest("/api/booking", booking_routes())
        .fallback(not_found_handler)
        .layer(from_fn_with_state(state.clone(), rate_limit_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
