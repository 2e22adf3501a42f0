use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The last value pushed by the market-health webhook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookRecord {
    pub value: Option<f64>,
    pub timestamp: Option<DateTime<Utc>>,
    pub status: String,
}

impl Default for WebhookRecord {
    fn default() -> Self {
        Self {
            value: None,
            timestamp: None,
            status: "No data".to_string(),
        }
    }
}

impl WebhookRecord {
    /// Builds a record from an unvalidated payload. A non-numeric `value` gets a random
    /// placeholder in `[0, 100)`, a non-string `status` becomes `"UPDATED"`;
    /// other fields are ignored.
    pub fn from_payload(payload: &Value, now: DateTime<Utc>) -> Self {
        let value = payload["value"]
            .as_f64()
            .unwrap_or_else(|| rand::thread_rng().gen_range(0.0..100.0));
        let status = payload["status"].as_str().unwrap_or("UPDATED").to_string();

        Self {
            value: Some(value),
            timestamp: Some(now),
            status,
        }
    }
}

/// Single-slot storage for the webhook record. Implementations hold exactly one value.
pub trait WebhookStore: Send + Sync {
    fn record(&self, record: WebhookRecord);
    fn read(&self) -> WebhookRecord;
}

/// Process memory store. Starts empty and forgets everything on restart.
///
/// The lock only makes each overwrite atomic. Concurrent POSTs are not ordered, so whichever
/// write lands last is what the next GET sees.
#[derive(Debug, Default)]
pub struct InMemoryWebhookStore {
    slot: RwLock<WebhookRecord>,
}

impl InMemoryWebhookStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl WebhookStore for InMemoryWebhookStore {
    fn record(&self, record: WebhookRecord) {
        *self.slot.write() = record;
    }

    fn read(&self) -> WebhookRecord {
        self.slot.read().clone()
    }
}
