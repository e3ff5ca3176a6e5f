use chrono::{DateTime, TimeDelta, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::collections::BTreeSet;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::interval;
use tracing::{debug, info, warn};

use prometheus::Gauge;

use crate::metrics::{BANS_TOTAL, TRACKED_IPS};

pub const UNKNOWN_IP: &str = "unknown";
pub const DEFAULT_BAN_DURATION: Duration = Duration::from_secs(60 * 60);

// Rate limit entry - tracks requests per client IP
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitRecord {
    pub request_count: u32,
    pub window_reset_at: DateTime<Utc>,
    // Some(_) exactly when the IP is banned
    ban_expires_at: Option<DateTime<Utc>>,
}

impl RateLimitRecord {
    fn fresh(window_reset_at: DateTime<Utc>) -> Self {
        Self {
            request_count: 0,
            window_reset_at,
            ban_expires_at: None,
        }
    }

    pub fn is_banned(&self) -> bool {
        self.ban_expires_at.is_some()
    }

    pub fn ban_expires_at(&self) -> Option<DateTime<Utc>> {
        self.ban_expires_at
    }
}

#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub window: Duration,
    pub max_requests: u32,
    pub ban_duration: Duration,
    // Allow the request when the limiter itself fails
    pub fail_open: bool,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window: Duration::from_millis(900_000),
            max_requests: 1,
            ban_duration: DEFAULT_BAN_DURATION,
            fail_open: true,
        }
    }
}

/// What the surrounding HTTP layer knows about where a request came from.
#[derive(Debug, Clone, Default)]
pub struct RequestDescriptor {
    pub forwarded_for: Option<String>,
    pub peer_addr: Option<SocketAddr>,
    pub resolved_ip: Option<String>,
}

/// Successful check result, used to fill the `X-RateLimit-*` headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub remaining: u32,
    pub reset_at: DateTime<Utc>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RateLimitError {
    #[error("IP address is banned due to excessive requests")]
    Banned {
        ip: String,
        ban_expires_at: DateTime<Utc>,
    },

    #[error("Rate limit exceeded. IP has been banned temporarily.")]
    Exceeded {
        ip: String,
        ban_expires_at: DateTime<Utc>,
    },

    #[error("Rate limiter failure: {0}")]
    Internal(String),
}

/// Resolve the client IP: first forwarded-for entry, then the socket peer,
/// then the framework-resolved IP. `::1` collapses onto `127.0.0.1`.
pub fn normalize_client_ip(req: &RequestDescriptor) -> String {
    let forwarded = req
        .forwarded_for
        .as_deref()
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    let ip = forwarded
        .or_else(|| req.peer_addr.map(|addr| addr.ip().to_string()))
        .or_else(|| {
            req.resolved_ip
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| UNKNOWN_IP.to_string());

    let ip = if ip == "::1" { "127.0.0.1".to_string() } else { ip };
    debug!(client_ip = %ip, "client IP detected");
    ip
}

fn add(now: DateTime<Utc>, span: Duration) -> Result<DateTime<Utc>, RateLimitError> {
    let delta = TimeDelta::from_std(span)
        .map_err(|e| RateLimitError::Internal(format!("duration out of range: {e}")))?;
    now.checked_add_signed(delta)
        .ok_or_else(|| RateLimitError::Internal("timestamp overflow".to_string()))
}

/// Fixed-window limiter with escalation to a temporary ban.
///
/// One instance per process, shared through `Arc`. Each IP's check runs under
/// its DashMap shard lock, so the read-decide-write sequence for one IP is
/// atomic while unrelated IPs proceed in parallel.
pub struct RateLimiter {
    records: DashMap<String, RateLimitRecord>,
    config: RateLimitConfig,
    tracked: Gauge,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self::with_gauge(config, TRACKED_IPS.clone())
    }

    /// Report the tracked-IP count to `tracked` instead of the process gauge.
    pub fn with_gauge(config: RateLimitConfig, tracked: Gauge) -> Self {
        Self {
            records: DashMap::new(),
            config,
            tracked,
        }
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    pub fn check(&self, req: &RequestDescriptor) -> Result<RateLimitDecision, RateLimitError> {
        let ip = normalize_client_ip(req);
        self.check_ip_at(&ip, Utc::now())
    }

    pub fn check_ip_at(
        &self,
        ip: &str,
        now: DateTime<Utc>,
    ) -> Result<RateLimitDecision, RateLimitError> {
        // both up front, so a failure never leaves a half-updated record
        let next_reset = add(now, self.config.window)?;
        let ban_expires_at = add(now, self.config.ban_duration)?;

        let mut record = match self.records.entry(ip.to_string()) {
            Entry::Occupied(mut occupied) => {
                if let Some(expires) = occupied.get().ban_expires_at {
                    if now <= expires {
                        return Err(RateLimitError::Banned {
                            ip: ip.to_string(),
                            ban_expires_at: expires,
                        });
                    }
                    // ban lapsed: forget everything about this IP
                    debug!(client_ip = %ip, "ban expired, resetting record");
                    occupied.insert(RateLimitRecord::fresh(next_reset));
                }
                occupied.into_ref()
            }
            Entry::Vacant(vacant) => {
                self.tracked.inc();
                vacant.insert(RateLimitRecord::fresh(next_reset))
            }
        };

        // window expired..? Reset it
        if now > record.window_reset_at {
            record.request_count = 0;
            record.window_reset_at = next_reset;
            record.ban_expires_at = None;
        }

        record.request_count = record.request_count.saturating_add(1);

        if record.request_count > self.config.max_requests {
            record.request_count = 0;
            record.window_reset_at = next_reset;
            record.ban_expires_at = Some(ban_expires_at);
            BANS_TOTAL.inc();
            warn!(
                client_ip = %ip,
                ban_secs = self.config.ban_duration.as_secs(),
                "IP has been banned"
            );
            return Err(RateLimitError::Exceeded {
                ip: ip.to_string(),
                ban_expires_at,
            });
        }

        Ok(RateLimitDecision {
            allowed: true,
            remaining: self.config.max_requests.saturating_sub(record.request_count),
            reset_at: record.window_reset_at,
        })
    }

    /// IPs recorded as banned. A lapsed ban stays listed until the IP's next
    /// request or an explicit unban clears it.
    pub fn list_banned_ips(&self) -> BTreeSet<String> {
        self.records
            .iter()
            .filter(|r| r.value().is_banned())
            .map(|r| r.key().clone())
            .collect()
    }

    pub fn unban(&self, ip: &str) -> bool {
        match self.records.get_mut(ip) {
            Some(mut record) if record.is_banned() => {
                record.ban_expires_at = None;
                info!(client_ip = %ip, "IP has been unbanned");
                true
            }
            _ => false,
        }
    }

    /// Drop records whose window has expired and that are not banned.
    pub fn sweep(&self, now: DateTime<Utc>) -> usize {
        let before = self.records.len();
        self.records
            .retain(|_, r| r.is_banned() || now <= r.window_reset_at);
        let after = self.records.len();
        self.tracked.set(after as f64);
        before.saturating_sub(after)
    }

    pub fn tracked_ips(&self) -> usize {
        self.records.len()
    }

    pub fn record(&self, ip: &str) -> Option<RateLimitRecord> {
        self.records.get(ip).map(|r| r.value().clone())
    }
}

// Sweep task - runs every `period` for the life of the process
pub async fn run_sweeper(limiter: Arc<RateLimiter>, period: Duration) {
    let mut interval = interval(period);

    info!(?period, "rate limit sweeper started");

    loop {
        interval.tick().await;

        let removed = limiter.sweep(Utc::now());
        if removed > 0 {
            debug!(removed, remaining = limiter.tracked_ips(), "swept stale rate limit records");
        }
    }
}
