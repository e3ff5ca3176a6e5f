use axum::extract::{ConnectInfo, Request, State};
use axum::http::{HeaderMap, HeaderValue};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use chrono::SecondsFormat;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error};

use crate::metrics::{RATE_LIMITED_TOTAL, REQUEST_LATENCY, REQUEST_TOTAL};
use crate::rate_limit::{RateLimitDecision, RateLimitError, RequestDescriptor};
use crate::state::AppState;

pub const LIMIT_HEADER: &str = "x-ratelimit-limit";
pub const REMAINING_HEADER: &str = "x-ratelimit-remaining";
pub const RESET_HEADER: &str = "x-ratelimit-reset";

/// Collect the client address sources the limiter understands.
pub fn describe_request(req: &Request, trust_proxy: bool) -> RequestDescriptor {
    let headers = req.headers();

    // repeated X-Forwarded-For headers read as one comma-separated list
    let forwarded: Vec<&str> = headers
        .get_all("x-forwarded-for")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .collect();
    let forwarded_for = (!forwarded.is_empty()).then(|| forwarded.join(","));

    let peer_addr = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);

    let resolved_ip = if trust_proxy {
        headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    } else {
        None
    };

    RequestDescriptor {
        forwarded_for,
        peer_addr,
        resolved_ip,
    }
}

fn attach_headers(headers: &mut HeaderMap, limit: u32, decision: &RateLimitDecision) {
    headers.insert(LIMIT_HEADER, HeaderValue::from(limit));
    headers.insert(REMAINING_HEADER, HeaderValue::from(decision.remaining));
    let reset = decision.reset_at.to_rfc3339_opts(SecondsFormat::Millis, true);
    if let Ok(value) = HeaderValue::from_str(&reset) {
        headers.insert(RESET_HEADER, value);
    }
}

// Applied to every route
pub async fn rate_limit_middleware(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Response {
    REQUEST_TOTAL.inc();
    let start_time = Instant::now();

    let descriptor = describe_request(&req, state.trust_proxy);
    let config = state.limiter.config();

    let response = match state.limiter.check(&descriptor) {
        Ok(decision) => {
            let mut response = next.run(req).await;
            attach_headers(response.headers_mut(), config.max_requests, &decision);
            debug!(remaining = decision.remaining, "rate limit check passed");
            response
        }
        Err(RateLimitError::Internal(reason)) if config.fail_open => {
            error!(%reason, "rate limiter failed, allowing request");
            next.run(req).await
        }
        Err(e) => {
            if let RateLimitError::Internal(reason) = &e {
                error!(%reason, "rate limiter failed, rejecting request");
            } else {
                RATE_LIMITED_TOTAL.inc();
            }
            e.into_response()
        }
    };

    REQUEST_LATENCY.observe(start_time.elapsed().as_secs_f64());
    response
}
