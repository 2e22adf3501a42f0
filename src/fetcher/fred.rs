use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use reqwest::Client;
use serde_json::Value;

use super::{get_json, DataSource};
use crate::error::UpstreamError;
use crate::models::DataPoint;

/// FRED marks a missing observation with a literal ".".
const MISSING_VALUE: &str = ".";

pub struct FredFetcher {
    api_key: String,
    client: Client,
    base_url: String,
    start: String,
}

impl FredFetcher {
    pub fn new(client: Client, base_url: &str, api_key: &str, start: impl Into<String>) -> Self {
        Self {
            api_key: api_key.trim().to_string(),
            client,
            base_url: base_url.to_string(),
            start: start.into(),
        }
    }

    /// Start the observation window `days` widened by 20% before today.
    pub fn with_lookback(client: Client, base_url: &str, api_key: &str, days: i64) -> Self {
        let start = Utc::now().date_naive() - Duration::days(days * 6 / 5);
        Self::new(client, base_url, api_key, start.format("%Y-%m-%d").to_string())
    }

    pub fn start(&self) -> &str {
        &self.start
    }
}

#[async_trait]
impl DataSource for FredFetcher {
    fn name(&self) -> &'static str {
        "FRED"
    }

    async fn fetch_data(&self, series_id: &str) -> Result<Vec<DataPoint>, UpstreamError> {
        // Never log the key itself
        tracing::debug!(
            series_id,
            start = %self.start,
            key_len = self.api_key.len(),
            "FRED fetching observations"
        );

        let url = format!("{}/fred/series/observations", self.base_url);
        let request = self.client.get(&url).query(&[
            ("series_id", series_id),
            ("api_key", self.api_key.as_str()),
            ("file_type", "json"),
            ("observation_start", self.start.as_str()),
        ]);

        let json = get_json(self.name(), series_id, request).await?;
        let points = Self::parse_observations(&json);

        tracing::debug!(series_id, count = points.len(), "FRED observations parsed");
        Ok(points)
    }
}

impl FredFetcher {
    /// Pulls `observations[].{date,value}` out of the envelope.
    /// A missing array is "no data", not an error.
    pub fn parse_observations(json: &Value) -> Vec<DataPoint> {
        let Some(observations) = json["observations"].as_array() else {
            return Vec::new();
        };

        let mut data_points = Vec::with_capacity(observations.len());

        for obs in observations {
            let Some(date_str) = obs["date"].as_str() else {
                continue;
            };

            // "value": "123.45" normally, "." when missing
            let value = match &obs["value"] {
                Value::String(s) if s == MISSING_VALUE => continue,
                Value::String(s) => s.trim().parse::<f64>().ok(),
                Value::Number(n) => n.as_f64(),
                _ => None,
            };
            let Some(value) = value.filter(|v| v.is_finite()) else {
                continue;
            };

            match NaiveDate::parse_from_str(date_str, "%Y-%m-%d") {
                Ok(time) => data_points.push(DataPoint { time, value }),
                Err(e) => tracing::warn!(date = date_str, error = %e, "Skipping FRED observation"),
            }
        }

        data_points
    }
}
