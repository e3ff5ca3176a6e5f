use lazy_static::lazy_static;
use prometheus::{Counter, Gauge, Histogram, register_counter, register_gauge, register_histogram};


lazy_static! {
    pub static ref REQUEST_TOTAL: Counter =
        register_counter!("flight_booking_requests_total", "Total number of requests").unwrap();
    pub static ref RATE_LIMITED_TOTAL: Counter = register_counter!(
        "flight_booking_rate_limited_total",
        "Requests rejected by the rate limiter"
    )
    .unwrap();
    pub static ref BANS_TOTAL: Counter =
        register_counter!("flight_booking_ip_bans_total", "Total IP bans issued").unwrap();
    pub static ref REQUEST_LATENCY: Histogram = register_histogram!(
        "flight_booking_request_latency_seconds",
        "Request latency in seconds"
    )
    .unwrap();
    pub static ref TRACKED_IPS: Gauge = register_gauge!(
        "flight_booking_tracked_ips",
        "Current number of client IPs held by the rate limiter"
    )
    .unwrap();
}
