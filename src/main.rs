use axum::http::{HeaderValue, Method, header};
use clap::Parser; // for cli
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use flight_booking::config::Args;
use flight_booking::db::{Database, SupabaseClient};
use flight_booking::rate_limit::{RateLimiter, run_sweeper};
use flight_booking::routes::app;
use flight_booking::state::AppState;

fn cors_layer(origin: &str) -> anyhow::Result<CorsLayer> {
    if origin == "*" {
        return Ok(CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any));
    }

    Ok(CorsLayer::new()
        .allow_origin(HeaderValue::from_str(origin)?)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        // a missing .env is fine, everything can come from the environment
        eprintln!("no .env loaded: {e}");
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flight_booking=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // parse cli arguments
    let args = Args::parse();

    let db = SupabaseClient::new(reqwest::Client::new(), &args.supabase_url, &args.supabase_anon_key);
    if !db.ping().await {
        tracing::warn!("database not reachable at startup, continuing");
    }

    let rate_config = args.rate_limit_config();
    let limiter = Arc::new(RateLimiter::new(rate_config.clone()));

    // spawn the background sweeper
    tokio::spawn(run_sweeper(Arc::clone(&limiter), args.sweep_period()));

    let state = Arc::new(AppState::new(Arc::new(db), limiter, args.trust_proxy));
    let router = app(state).layer(cors_layer(&args.cors_origin)?);

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Flight Booking Engine running on http://localhost:{}", args.port);
    tracing::info!("Health check: http://localhost:{}/api/health", args.port);
    tracing::info!(
        "Rate limit: {} requests per {} ms, ban {} ms, fail open: {}",
        rate_config.max_requests,
        rate_config.window.as_millis(),
        rate_config.ban_duration.as_millis(),
        rate_config.fail_open
    );

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
