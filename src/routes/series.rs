//! Raw FRED series endpoints: the 10Y-2Y spread, the broad dollar index and a generic proxy.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use super::SERIES_CACHE_CONTROL;
use crate::core::timeseries::spread_by_date;
use crate::error::AppError;
use crate::fetcher::DataSource;
use crate::models::{DataPoint, SeriesResponse};
use crate::state::AppState;

pub const DEFAULT_START: &str = "2018-01-01";
pub const SPREAD_SERIES_ID: &str = "DGS10-DGS2";
/// Trade-weighted broad dollar index. Not ICE DXY, but tracks it closely enough for trend work.
pub const DOLLAR_SERIES_ID: &str = "DTWEXBGS";

#[derive(Debug, Deserialize)]
pub struct StartQuery {
    pub start: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FredSeriesQuery {
    pub series_id: Option<String>,
    pub start: Option<String>,
}

fn start_or_default(start: Option<String>) -> String {
    start
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_START.to_string())
}

fn series_response(series_id: &str, start: String, points: Vec<DataPoint>) -> impl IntoResponse {
    (
        [(header::CACHE_CONTROL, SERIES_CACHE_CONTROL)],
        Json(SeriesResponse {
            series_id: series_id.to_string(),
            start,
            points,
        }),
    )
}

/// GET /yield-spread?start=YYYY-MM-DD
pub async fn yield_spread(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StartQuery>,
) -> Result<impl IntoResponse, AppError> {
    let fred = state.fred_from(&start_or_default(query.start))?;

    let (ten, two) = tokio::try_join!(fred.fetch_data("DGS10"), fred.fetch_data("DGS2"))?;
    let points = spread_by_date(&ten, &two);

    tracing::info!(
        ten = ten.len(),
        two = two.len(),
        spread = points.len(),
        "Yield spread computed"
    );
    Ok(series_response(SPREAD_SERIES_ID, fred.start().to_string(), points))
}

/// GET /dxy?start=YYYY-MM-DD
pub async fn dxy(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StartQuery>,
) -> Result<impl IntoResponse, AppError> {
    let fred = state.fred_from(&start_or_default(query.start))?;
    let points = fred.fetch_data(DOLLAR_SERIES_ID).await?;

    Ok(series_response(DOLLAR_SERIES_ID, fred.start().to_string(), points))
}

/// GET /fred-series?series_id=<ID>&start=YYYY-MM-DD
pub async fn fred_series(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FredSeriesQuery>,
) -> Result<impl IntoResponse, AppError> {
    let fred = state.fred_from(&start_or_default(query.start))?;

    let series_id = query
        .series_id
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::BadRequest("series_id is required".to_string()))?;

    let points = fred.fetch_data(&series_id).await?;
    Ok(series_response(&series_id, fred.start().to_string(), points))
}
