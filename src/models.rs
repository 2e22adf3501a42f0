use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single observation as served to the dashboard: `{ "time": "2024-01-02", "value": 4.01 }`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DataPoint {
    pub time: NaiveDate,
    pub value: f64,
}

impl DataPoint {
    pub fn new(time: NaiveDate, value: f64) -> Self {
        Self { time, value }
    }
}

/// Response body shared by the raw series endpoints.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SeriesResponse {
    pub series_id: String,
    pub start: String,
    pub points: Vec<DataPoint>,
}
