use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Client;

use crate::error::UpstreamError;
use crate::models::DataPoint;

pub mod fred;
pub mod yahoo;

#[async_trait]
pub trait DataSource: Send + Sync {
    fn name(&self) -> &'static str;
    async fn fetch_data(&self, series_id: &str) -> Result<Vec<DataPoint>, UpstreamError>;
}

/// HTTP client shared by every fetcher.
pub fn build_client() -> Client {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static("MacroFeed/1.0"));

    Client::builder()
        .default_headers(headers)
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Sends a prepared GET and decodes the JSON body, mapping every failure to an [`UpstreamError`].
pub(crate) async fn get_json(
    provider: &'static str,
    series: &str,
    request: reqwest::RequestBuilder,
) -> Result<serde_json::Value, UpstreamError> {
    // reqwest errors carry the request URL, and FRED URLs carry the API key.
    let resp = request.send().await.map_err(|source| UpstreamError::Transport {
        provider,
        series: series.to_string(),
        source: source.without_url(),
    })?;

    if !resp.status().is_success() {
        return Err(UpstreamError::Status {
            provider,
            series: series.to_string(),
            status: resp.status(),
        });
    }

    resp.json().await.map_err(|source| UpstreamError::Decode {
        provider,
        series: series.to_string(),
        source: source.without_url(),
    })
}
