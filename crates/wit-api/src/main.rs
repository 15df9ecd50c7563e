// WIT combat log api - upload, preview and stored sessions

mod config;
mod error;
mod handlers;
mod middleware;
mod models;
mod state;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
};
use clickhouse::Client as ClickHouseClient;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::config::{DEFAULT_CONFIG_PATH, load_or_default};
use crate::handlers::{get_session_events, list_sessions, preview_combat_log, upload_combat_log};
use crate::middleware::{expected_api_key, require_api_key};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file
    dotenvy::dotenv().ok();

    //logging setup
    tracing_subscriber::fmt::init();

    let config_path = std::env::var("WIT_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = load_or_default(&config_path)?;
    info!(path = %config_path, max_log_bytes = config.max_log_bytes, "Config loaded");

    // connect to NATS
    info!("Connecting to NATS...");
    let nats = async_nats::connect(config.nats_url.as_str()).await?;
    info!("Connected to NATS!");

    // ClickHouse client (connects lazily)
    let clickhouse = ClickHouseClient::default()
        .with_url(config.clickhouse.url.as_str())
        .with_database(config.clickhouse.database.as_str());
    info!(url = %config.clickhouse.url, database = %config.clickhouse.database, "ClickHouse client ready");

    // json escaping can double a log's size on the wire
    let body_limit = config.max_log_bytes.saturating_mul(2);
    let bind_addr = config.bind_addr.clone();

    let state = Arc::new(AppState {
        nats,
        clickhouse,
        config,
    });

    //routes - protected routes with API key
    let protected_routes = Router::new()
        .route("/api/combat-logs", post(upload_combat_log))
        .route("/api/combat-logs/preview", post(preview_combat_log))
        .route("/api/combat-logs/sessions", get(list_sessions))
        .route("/api/combat-logs/{session_id}/events", get(get_session_events))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(axum_middleware::from_fn(require_api_key));

    // Health endpoint without auth
    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .merge(protected_routes)
        .layer(CorsLayer::permissive())
        .with_state(state);

    if expected_api_key().is_some() {
        info!("API key authentication ENABLED");
    } else {
        info!("API key authentication DISABLED (set WIT_API_KEY to enable)");
    }

    // Server start
    info!("Starting server on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
