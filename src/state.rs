use std::sync::Arc;
use std::time::Instant;
use crate::db::Database;
use crate::rate_limit::RateLimiter;
// app's shared state

pub struct AppState {
    pub db: Arc<dyn Database>,
    pub limiter: Arc<RateLimiter>, // the one limiter for this process
    pub trust_proxy: bool,         // read X-Real-IP as the resolved client IP
    pub started_at: Instant,
}

impl AppState {
    pub fn new(db: Arc<dyn Database>, limiter: Arc<RateLimiter>, trust_proxy: bool) -> Self {
        Self {
            db,
            limiter,
            trust_proxy,
            started_at: Instant::now(),
        }
    }
}
