//! Webhook receivers. Bodies are taken as-is: anything that is not JSON reads as an empty payload.

use std::sync::Arc;

use axum::{body::Bytes, extract::State, Json};
use chrono::Utc;
use serde_json::{json, Value};

use crate::core::webhook_store::WebhookRecord;
use crate::state::AppState;

fn parse_payload(body: &Bytes) -> Value {
    serde_json::from_slice(body).unwrap_or(Value::Null)
}

/// POST /extreme-momentum
pub async fn extreme_momentum(body: Bytes) -> Json<Value> {
    let payload = parse_payload(&body);
    tracing::info!(%payload, "Received extreme momentum data");
    Json(json!({ "success": true }))
}

/// POST /market-health
pub async fn record_market_health(State(state): State<Arc<AppState>>, body: Bytes) -> Json<Value> {
    let record = WebhookRecord::from_payload(&parse_payload(&body), Utc::now());
    tracing::info!(value = ?record.value, status = %record.status, "Market health updated");

    state.market_health.record(record);
    Json(json!({ "success": true }))
}

/// GET /market-health
pub async fn read_market_health(State(state): State<Arc<AppState>>) -> Json<WebhookRecord> {
    Json(state.market_health.read())
}

/// POST /market-health/ack. Stateless variant: logs and acknowledges, stores nothing.
pub async fn acknowledge_market_health(body: Bytes) -> Json<Value> {
    let payload = parse_payload(&body);
    tracing::info!(%payload, "Market health webhook acknowledged");
    Json(json!({ "received": true }))
}
