use std::sync::Arc;

use axum::http::Method;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod analysis;
pub mod config;
pub mod core;
pub mod error;
pub mod fetcher;
pub mod models;
pub mod routes;
pub mod state;

use crate::config::Config;
use crate::state::AppState;

pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "macro_feed=info,macro_feed_lib=info,tower_http=info".into()),
        )
        .init();
}

/// Full application: API routes plus request tracing and a CORS policy open to the dashboard.
pub fn build_app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    routes::create_api_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = Config::from_env();
    if config.fred_api_key.is_none() {
        tracing::warn!("FRED_API_KEY is not set; FRED-backed endpoints will answer 500");
    }

    let addr = config.socket_addr()?;
    let state = Arc::new(AppState::new(config));
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Macro feed listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
