// ABOUTME: Server binary for the huddle task tracker
// ABOUTME: Wires config, database, router, CORS, and the session sweeper together

use std::net::SocketAddr;
use std::time::Duration;

use axum::http::Method;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

mod config;

use config::Config;
use huddle_api::{create_router, AppState};

/// How often expired sessions are swept from the store.
const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60 * 60);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env()?;

    println!("🚀 Starting Huddle server...");
    println!("📡 Server will run on http://localhost:{}", config.port);
    println!("🔗 CORS origin: {}", config.cors_origin);

    let pool = huddle_storage::connect(config.db_path.clone()).await?;
    let state = AppState::new(pool, config.session_ttl_hours);

    spawn_session_sweeper(state.clone());

    let cors = CorsLayer::new()
        .allow_origin(config.cors_origin.parse::<axum::http::HeaderValue>()?)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let app = create_router(state).layer(cors);

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    println!("✅ Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Periodically drop expired sessions so the table does not grow forever.
fn spawn_session_sweeper(state: AppState) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            match state.auth.purge_expired_sessions().await {
                Ok(0) => {}
                Ok(count) => info!("Purged {} expired sessions", count),
                Err(e) => warn!("Session sweep failed: {}", e),
            }
        }
    });
}
