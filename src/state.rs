use std::sync::Arc;

use reqwest::Client;

use crate::config::Config;
use crate::core::webhook_store::{InMemoryWebhookStore, WebhookStore};
use crate::error::AppError;
use crate::fetcher::build_client;
use crate::fetcher::fred::FredFetcher;
use crate::fetcher::yahoo::YahooFetcher;

/// Shared by every handler. Cloning the `Arc` around it is the only per-request cost.
pub struct AppState {
    pub config: Config,
    pub client: Client,
    pub market_health: Arc<dyn WebhookStore>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self::with_store(config, Arc::new(InMemoryWebhookStore::new()))
    }

    pub fn with_store(config: Config, market_health: Arc<dyn WebhookStore>) -> Self {
        Self {
            config,
            client: build_client(),
            market_health,
        }
    }

    /// FRED fetcher starting at `start`; fails with a config error when the key is unset.
    pub fn fred_from(&self, start: &str) -> Result<FredFetcher, AppError> {
        let key = self.config.require_fred_key()?;
        Ok(FredFetcher::new(self.client.clone(), &self.config.fred_base_url, key, start))
    }

    /// FRED fetcher covering the last `days` (widened by 20%).
    pub fn fred_lookback(&self, days: i64) -> Result<FredFetcher, AppError> {
        let key = self.config.require_fred_key()?;
        Ok(FredFetcher::with_lookback(self.client.clone(), &self.config.fred_base_url, key, days))
    }

    pub fn yahoo(&self) -> YahooFetcher {
        YahooFetcher::new(self.client.clone(), &self.config.yahoo_base_url)
    }
}
