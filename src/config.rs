use clap::Parser;
use std::time::Duration;

use crate::rate_limit::RateLimitConfig;

// Longest window or ban accepted, 100 years in ms. Timestamps past this risk
// running off the end of the calendar the limiter computes with.
pub const MAX_DURATION_MS: u64 = 100 * 365 * 24 * 60 * 60 * 1000;

// CLI argument structure, every flag can also come from the environment
#[derive(Parser, Debug, Clone)]
#[command(name = "flight-booking")]
#[command(about = "Flight booking REST API with per-IP rate limiting")]
pub struct Args {
    // Port to run the server on
    #[arg(short, long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    // Rate limit window in milliseconds (15 minutes)
    #[arg(
        long,
        env = "RATE_LIMIT_WINDOW",
        default_value_t = 900_000,
        value_parser = clap::value_parser!(u64).range(1..=MAX_DURATION_MS)
    )]
    pub rate_limit_window: u64,

    // Rate limit max requests per window
    #[arg(long, env = "RATE_LIMIT_MAX_REQUESTS", default_value_t = 1)]
    pub rate_limit_max_requests: u32,

    // Ban length in milliseconds once an IP goes over quota
    #[arg(
        long,
        env = "RATE_LIMIT_BAN_DURATION",
        default_value_t = 3_600_000,
        value_parser = clap::value_parser!(u64).range(1..=MAX_DURATION_MS)
    )]
    pub ban_duration: u64,

    // Seconds between sweeps of stale rate limit records
    #[arg(long, env = "RATE_LIMIT_SWEEP_INTERVAL", default_value_t = 60)]
    pub sweep_interval: u64,

    // Consult X-Real-IP as the proxy-resolved client address
    #[arg(long, env = "TRUST_PROXY")]
    pub trust_proxy: bool,

    // Reject requests (503) when the limiter itself errors, instead of allowing them
    #[arg(long, env = "RATE_LIMIT_FAIL_CLOSED")]
    pub fail_closed: bool,

    #[arg(long, env = "SUPABASE_URL")]
    pub supabase_url: String,

    #[arg(long, env = "SUPABASE_ANON_KEY", hide_env_values = true)]
    pub supabase_anon_key: String,

    #[arg(long, env = "CORS_ORIGIN", default_value = "*")]
    pub cors_origin: String,
}

impl Args {
    pub fn rate_limit_config(&self) -> RateLimitConfig {
        RateLimitConfig {
            window: Duration::from_millis(self.rate_limit_window),
            max_requests: self.rate_limit_max_requests,
            ban_duration: Duration::from_millis(self.ban_duration),
            fail_open: !self.fail_closed,
        }
    }

    pub fn sweep_period(&self) -> Duration {
        Duration::from_secs(self.sweep_interval.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(extra: &[&str]) -> Args {
        let mut argv = vec![
            "flight-booking",
            "--supabase-url",
            "https://example.supabase.co",
            "--supabase-anon-key",
            "anon",
        ];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn rate_limit_overrides() {
        let args = parse(&[
            "--rate-limit-window",
            "1000",
            "--rate-limit-max-requests",
            "20",
            "--ban-duration",
            "5000",
            "--fail-closed",
        ]);
        let cfg = args.rate_limit_config();
        assert_eq!(cfg.window, Duration::from_secs(1));
        assert_eq!(cfg.max_requests, 20);
        assert_eq!(cfg.ban_duration, Duration::from_secs(5));
        assert!(!cfg.fail_open);
    }

    #[test]
    fn sweep_period_never_zero() {
        let args = parse(&["--sweep-interval", "0"]);
        assert_eq!(args.sweep_period(), Duration::from_secs(1));
    }

    #[test]
    fn rejects_durations_past_the_cap() {
        let base = [
            "flight-booking",
            "--supabase-url",
            "https://example.supabase.co",
            "--supabase-anon-key",
            "anon",
        ];
        let forever = u64::MAX.to_string();
        for flag in ["--ban-duration", "--rate-limit-window"] {
            let mut argv = base.to_vec();
            argv.extend_from_slice(&[flag, forever.as_str()]);
            assert!(Args::try_parse_from(argv).is_err(), "{flag} accepted u64::MAX");
        }

        let cap = MAX_DURATION_MS.to_string();
        let args = parse(&["--ban-duration", cap.as_str()]);
        assert_eq!(args.rate_limit_config().ban_duration, Duration::from_millis(MAX_DURATION_MS));
    }
}
