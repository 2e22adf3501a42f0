use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use super::MACRO_CACHE_CONTROL;
use crate::analysis::market_status::{load_inputs, MacroReport};
use crate::error::AppError;
use crate::state::AppState;

/// FRED history window for the rate series, in days.
const FRED_LOOKBACK_DAYS: i64 = 500;

pub async fn compute_macro(state: &AppState) -> Result<MacroReport, AppError> {
    let fred = state.fred_lookback(FRED_LOOKBACK_DAYS)?;
    let yahoo = state.yahoo();

    let inputs = load_inputs(&fred, &yahoo).await?;
    Ok(MacroReport::compute(&inputs))
}

/// GET /macro
///
/// Always answers 200. Any failure (missing key, one upstream down) yields the neutral
/// fallback report with the cause in `error`, and no cache header.
pub async fn get_macro(State(state): State<Arc<AppState>>) -> Response {
    match compute_macro(&state).await {
        Ok(report) => {
            tracing::info!(
                macro_score = report.metrics.macro_score,
                "Macro feed computed"
            );
            ([(header::CACHE_CONTROL, MACRO_CACHE_CONTROL)], Json(report)).into_response()
        }
        Err(e) => {
            tracing::warn!("Macro feed falling back to neutral values: {}", e);
            (StatusCode::OK, Json(MacroReport::fallback(e.to_string()))).into_response()
        }
    }
}
