use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use reqwest::Client;
use serde_json::Value;

use super::{get_json, DataSource};
use crate::error::UpstreamError;
use crate::models::DataPoint;

pub struct YahooFetcher {
    client: Client,
    base_url: String,
    range: String,
    interval: String,
}

impl YahooFetcher {
    /// Two years of daily closes.
    pub fn new(client: Client, base_url: &str) -> Self {
        Self::with_range(client, base_url, "2y", "1d")
    }

    pub fn with_range(client: Client, base_url: &str, range: &str, interval: &str) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
            range: range.to_string(),
            interval: interval.to_string(),
        }
    }
}

#[async_trait]
impl DataSource for YahooFetcher {
    fn name(&self) -> &'static str {
        "Yahoo"
    }

    async fn fetch_data(&self, symbol: &str) -> Result<Vec<DataPoint>, UpstreamError> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, encode_symbol(symbol));
        tracing::debug!(symbol, range = %self.range, "Yahoo fetching chart");

        let request = self
            .client
            .get(&url)
            .query(&[("range", self.range.as_str()), ("interval", self.interval.as_str())]);

        let json = get_json(self.name(), symbol, request).await?;
        Ok(Self::parse_chart(&json))
    }
}

impl YahooFetcher {
    /// Reads `chart.result[0].indicators.quote[0].close`, pairing each close with its
    /// `timestamp` entry. `null` closes are Yahoo's "no trade" marker and are dropped, as are
    /// closes without a usable timestamp.
    pub fn parse_chart(json: &Value) -> Vec<DataPoint> {
        let result = &json["chart"]["result"][0];
        let Some(closes) = result["indicators"]["quote"][0]["close"].as_array() else {
            return Vec::new();
        };
        let timestamps = result["timestamp"].as_array();

        closes
            .iter()
            .enumerate()
            .filter_map(|(i, close)| {
                let value = close.as_f64().filter(|v| v.is_finite())?;
                let time = timestamps
                    .and_then(|ts| ts.get(i))
                    .and_then(Value::as_i64)
                    .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
                    .map(|dt| dt.date_naive())?;
                Some(DataPoint { time, value })
            })
            .collect()
    }
}

/// Percent-encodes a ticker the way `encodeURIComponent` does
/// (`^VIX` -> `%5EVIX`, `GC=F` -> `GC%3DF`).
pub fn encode_symbol(symbol: &str) -> String {
    let mut out = String::with_capacity(symbol.len());
    for byte in symbol.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(byte as char),
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    #[test]
    fn test_encode_symbol() {
        assert_eq!(encode_symbol("^VIX"), "%5EVIX");
        assert_eq!(encode_symbol("GC=F"), "GC%3DF");
        assert_eq!(encode_symbol("SPY"), "SPY");
    }

    #[test]
    fn test_parse_chart_skips_null_closes() {
        let json_data = json!({
            "chart": {
                "result": [{
                    "timestamp": [1704205800, 1704292200, 1704378600],
                    "indicators": { "quote": [{ "close": [470.5, null, 468.25] }] }
                }]
            }
        });

        let points = YahooFetcher::parse_chart(&json_data);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].value, 470.5);
        assert_eq!(points[0].time, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(points[1].value, 468.25);
        assert_eq!(points[1].time, NaiveDate::from_ymd_opt(2024, 1, 4).unwrap());
    }

    #[test]
    fn test_parse_chart_skips_closes_without_timestamp() {
        let json_data = json!({
            "chart": {
                "result": [{
                    "timestamp": [1704205800],
                    "indicators": { "quote": [{ "close": [470.5, 468.25] }] }
                }]
            }
        });

        let points = YahooFetcher::parse_chart(&json_data);
        let jan_2 = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        assert_eq!(points, vec![DataPoint::new(jan_2, 470.5)]);

        let no_timestamps = json!({
            "chart": { "result": [{ "indicators": { "quote": [{ "close": [1.0, 2.0] }] } }] }
        });
        assert!(YahooFetcher::parse_chart(&no_timestamps).is_empty());
    }

    #[test]
    fn test_parse_chart_without_result_is_empty() {
        let json_data = json!({ "chart": { "result": null, "error": { "code": "Not Found" } } });
        assert!(YahooFetcher::parse_chart(&json_data).is_empty());
    }
}
