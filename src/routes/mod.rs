//! HTTP surface.
//!
//! Every endpoint is method-gated: an unsupported verb gets `405 {"error":"Method not allowed"}`
//! rather than axum's empty default.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::error::AppError;
use crate::state::AppState;

pub mod health;
pub mod macro_feed;
pub mod series;
pub mod webhooks;

/// CDN hint for the raw FRED series endpoints.
pub const SERIES_CACHE_CONTROL: &str = "s-maxage=3600, stale-while-revalidate";
/// CDN hint for the composite macro feed.
pub const MACRO_CACHE_CONTROL: &str = "s-maxage=60, stale-while-revalidate=600";

pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

pub fn create_api_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check).fallback(method_not_allowed))
        .route("/yield-spread", get(series::yield_spread).fallback(method_not_allowed))
        .route("/dxy", get(series::dxy).fallback(method_not_allowed))
        .route("/fred-series", get(series::fred_series).fallback(method_not_allowed))
        .route("/macro", get(macro_feed::get_macro).fallback(method_not_allowed))
        .route(
            "/extreme-momentum",
            post(webhooks::extreme_momentum).fallback(method_not_allowed),
        )
        .route(
            "/market-health",
            post(webhooks::record_market_health)
                .get(webhooks::read_market_health)
                .fallback(method_not_allowed),
        )
        .route(
            "/market-health/ack",
            post(webhooks::acknowledge_market_health).fallback(method_not_allowed),
        )
        .with_state(state)
}
